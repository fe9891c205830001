//! Single-precision vector and matrix types.
//!
//! All of them are plain `f32` aggregates; on the wire each component is
//! byte-swapped on its own when the byte order differs from the host.

use bytemuck::{Pod, Zeroable};

use crate::primitive::{pod_batch, pod_scalar, Primitive};

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector2 {
	pub x: f32,
	pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3 {
	pub x: f32,
	pub y: f32,
	pub z: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector4 {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub w: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quaternion {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub w: f32,
}

impl Quaternion {
	pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };
}

impl Default for Quaternion {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// A row-major 4x4 matrix; `m[0]` holds M11..M14.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix4x4 {
	pub m: [[f32; 4]; 4],
}

impl Matrix4x4 {
	pub const IDENTITY: Self = Self {
		m: [
			[1.0, 0.0, 0.0, 0.0],
			[0.0, 1.0, 0.0, 0.0],
			[0.0, 0.0, 1.0, 0.0],
			[0.0, 0.0, 0.0, 1.0],
		],
	};
}

impl Default for Matrix4x4 {
	fn default() -> Self {
		Self::IDENTITY
	}
}

macro_rules! impl_float_aggregate {
	($($t:ty),*) => {$(
		impl Primitive for $t {
			const SIZE: usize = std::mem::size_of::<$t>();

			pod_scalar!(4);
			pod_batch!(4);
		}
	)*};
}

impl_float_aggregate!(Vector2, Vector3, Vector4, Quaternion, Matrix4x4);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::primitive::{read, read_many, write, write_many};
	use crate::Endianness;

	#[test]
	fn components_swap_independently() {
		let value = Vector2 { x: 1.0, y: -2.0 };
		let mut buf = [0; 8];
		write(&mut buf, value, Endianness::BigEndian).unwrap();
		assert_eq!(buf, [0x3f, 0x80, 0, 0, 0xc0, 0, 0, 0]);
		write(&mut buf, value, Endianness::LittleEndian).unwrap();
		assert_eq!(buf, [0, 0, 0x80, 0x3f, 0, 0, 0, 0xc0]);
		assert_eq!(read::<Vector2>(&buf, Endianness::LittleEndian).unwrap(), value);
	}

	#[test]
	fn matrix_round_trips_in_batches() {
		let mut second = Matrix4x4::IDENTITY;
		second.m[3] = [4.0, 5.0, 6.0, 1.0];
		let values = [Matrix4x4::IDENTITY, second];
		let mut buf = [0; 128];
		write_many(&mut buf, &values, Endianness::BigEndian).unwrap();
		assert_eq!(&buf[..4], &[0x3f, 0x80, 0, 0]);
		let mut back = [Matrix4x4::default(); 2];
		read_many(&buf, Endianness::BigEndian, &mut back).unwrap();
		assert_eq!(back, values);
	}

	#[test]
	fn sizes() {
		assert_eq!(Vector3::SIZE, 12);
		assert_eq!(Quaternion::SIZE, 16);
		assert_eq!(Matrix4x4::SIZE, 64);
	}
}
