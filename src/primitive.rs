use std::mem::size_of;

use half::f16;

use crate::{BooleanSize, Endianness, Error, Result};

/**
	A fixed-width value with a byte-exact wire representation.

	`decode` and `encode` are handed windows of exactly [`Primitive::SIZE`] bytes; the free functions [`read`], [`write`], [`read_many`] and [`write_many`] check the window size before calling them. The batch methods must produce the same bytes as calling the scalar ones element by element, and are overridden for plain-old-data types to copy the whole run at once and swap byte lanes in place.

	Implemented for all integers up to 128 bits, [`f16`], `f32`, `f64`, [`Decimal`](crate::Decimal), the `chrono` date/time types, and the vector/matrix types in [`types`](crate::types). Fieldless enums get an implementation through `#[derive(BinaryEnum)]`.

	## Examples

	```
	use binrec::{primitive, Endianness};

	let mut buf = [0; 4];
	primitive::write(&mut buf, 0x0df0_adba_u32, Endianness::BigEndian).unwrap();
	assert_eq!(buf, [0x0d, 0xf0, 0xad, 0xba]);
	let val: u32 = primitive::read(&buf, Endianness::LittleEndian).unwrap();
	assert_eq!(val, 0xbaad_f00d);
	```
*/
pub trait Primitive: Copy {
	/// Size on the wire in bytes.
	const SIZE: usize;

	/// Decodes a value from exactly `SIZE` bytes.
	fn decode(src: &[u8], endianness: Endianness) -> Result<Self>;

	/// Encodes the value into exactly `SIZE` bytes.
	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()>;

	/// Decodes `dst.len()` consecutive values from `src`, which holds exactly `dst.len() * SIZE` bytes.
	fn decode_many(src: &[u8], endianness: Endianness, dst: &mut [Self]) -> Result<()> {
		for (chunk, out) in src.chunks_exact(Self::SIZE).zip(dst) {
			*out = Self::decode(chunk, endianness)?;
		}
		Ok(())
	}

	/// Decodes `count` consecutive values from `src`, which holds exactly `count * SIZE` bytes.
	fn decode_vec(src: &[u8], endianness: Endianness, count: usize) -> Result<Vec<Self>> {
		debug_assert_eq!(src.len(), count * Self::SIZE);
		src.chunks_exact(Self::SIZE).map(|chunk| Self::decode(chunk, endianness)).collect()
	}

	/// Encodes `values` into `dst`, which holds exactly `values.len() * SIZE` bytes.
	fn encode_many(values: &[Self], endianness: Endianness, dst: &mut [u8]) -> Result<()> {
		for (value, chunk) in values.iter().zip(dst.chunks_exact_mut(Self::SIZE)) {
			value.encode(chunk, endianness)?;
		}
		Ok(())
	}
}

#[inline]
fn check_size(required: usize, actual: usize) -> Result<()> {
	if actual < required {
		return Err(Error::Size { required, actual });
	}
	Ok(())
}

/// Byte length of `count` elements of `size` bytes.
pub(crate) fn run_len(count: usize, size: usize) -> Result<usize> {
	count.checked_mul(size).ok_or_else(|| Error::OutOfRange(format!("run of {count} elements of {size} bytes")))
}

#[inline]
pub(crate) fn fixed<const N: usize>(src: &[u8]) -> Result<[u8; N]> {
	src.try_into().map_err(|_| Error::Size { required: N, actual: src.len() })
}

#[inline]
pub(crate) fn put(dst: &mut [u8], bytes: &[u8]) -> Result<()> {
	if dst.len() != bytes.len() {
		return Err(Error::Size { required: bytes.len(), actual: dst.len() });
	}
	dst.copy_from_slice(bytes);
	Ok(())
}

/// Reads one `T` from the start of `src`.
pub fn read<T: Primitive>(src: &[u8], endianness: Endianness) -> Result<T> {
	check_size(T::SIZE, src.len())?;
	T::decode(&src[..T::SIZE], endianness)
}

/// Writes `value` to the start of `dst`.
pub fn write<T: Primitive>(dst: &mut [u8], value: T, endianness: Endianness) -> Result<()> {
	check_size(T::SIZE, dst.len())?;
	value.encode(&mut dst[..T::SIZE], endianness)
}

/// Fills `dst` with consecutive values read from the start of `src`.
pub fn read_many<T: Primitive>(src: &[u8], endianness: Endianness, dst: &mut [T]) -> Result<()> {
	let len = run_len(dst.len(), T::SIZE)?;
	check_size(len, src.len())?;
	T::decode_many(&src[..len], endianness, dst)
}

/// Writes `values` consecutively to the start of `dst`.
pub fn write_many<T: Primitive>(dst: &mut [u8], values: &[T], endianness: Endianness) -> Result<()> {
	let len = run_len(values.len(), T::SIZE)?;
	check_size(len, dst.len())?;
	T::encode_many(values, endianness, &mut dst[..len])
}

/// Reads a boolean of the given width; any nonzero value is `true`.
pub fn read_bool(src: &[u8], size: BooleanSize, endianness: Endianness) -> Result<bool> {
	Ok(match size {
		BooleanSize::U8 => read::<u8>(src, endianness)? != 0,
		BooleanSize::U16 => read::<u16>(src, endianness)? != 0,
		BooleanSize::U32 => read::<u32>(src, endianness)? != 0,
	})
}

/// Writes a boolean of the given width as exactly 0 or 1.
pub fn write_bool(dst: &mut [u8], value: bool, size: BooleanSize, endianness: Endianness) -> Result<()> {
	match size {
		BooleanSize::U8 => write(dst, u8::from(value), endianness),
		BooleanSize::U16 => write(dst, u16::from(value), endianness),
		BooleanSize::U32 => write(dst, u32::from(value), endianness),
	}
}

/// Fills `dst` with consecutive booleans of the given width.
pub fn read_bools(src: &[u8], size: BooleanSize, endianness: Endianness, dst: &mut [bool]) -> Result<()> {
	let width = size.size();
	check_size(run_len(dst.len(), width)?, src.len())?;
	for (chunk, out) in src.chunks_exact(width).zip(dst) {
		// zero in every byte is false regardless of byte order
		*out = chunk.iter().any(|&b| b != 0);
	}
	Ok(())
}

/// Writes `values` as consecutive booleans of the given width.
pub fn write_bools(dst: &mut [u8], values: &[bool], size: BooleanSize, endianness: Endianness) -> Result<()> {
	let width = size.size();
	check_size(run_len(values.len(), width)?, dst.len())?;
	for (&value, chunk) in values.iter().zip(dst.chunks_exact_mut(width)) {
		write_bool(chunk, value, size, endianness)?;
	}
	Ok(())
}

/// Size of a 24-bit integer on the wire.
pub const INT24_SIZE: usize = 3;

const INT24_MIN: i32 = -0x80_0000;
const INT24_MAX: i32 = 0x7f_ffff;
const UINT24_MAX: u32 = 0xff_ffff;

/// Reads an unsigned 24-bit integer.
pub fn read_u24(src: &[u8], endianness: Endianness) -> Result<u32> {
	check_size(INT24_SIZE, src.len())?;
	let [a, b, c] = fixed::<INT24_SIZE>(&src[..INT24_SIZE])?;
	Ok(match endianness {
		Endianness::LittleEndian => u32::from_le_bytes([a, b, c, 0]),
		Endianness::BigEndian => u32::from_be_bytes([0, a, b, c]),
	})
}

/// Reads a signed 24-bit integer, sign-extending it to 32 bits.
pub fn read_i24(src: &[u8], endianness: Endianness) -> Result<i32> {
	let raw = read_u24(src, endianness)?;
	Ok(((raw << 8) as i32) >> 8)
}

/// Writes an unsigned 24-bit integer; values above `0xFFFFFF` are rejected.
pub fn write_u24(dst: &mut [u8], value: u32, endianness: Endianness) -> Result<()> {
	check_size(INT24_SIZE, dst.len())?;
	if value > UINT24_MAX {
		return Err(Error::OutOfRange(format!("{value} does not fit in 24 bits")));
	}
	let bytes = match endianness {
		Endianness::LittleEndian => {
			let [a, b, c, _] = value.to_le_bytes();
			[a, b, c]
		}
		Endianness::BigEndian => {
			let [_, a, b, c] = value.to_be_bytes();
			[a, b, c]
		}
	};
	put(&mut dst[..INT24_SIZE], &bytes)
}

/// Writes a signed 24-bit integer; values outside `-0x800000..=0x7FFFFF` are rejected.
pub fn write_i24(dst: &mut [u8], value: i32, endianness: Endianness) -> Result<()> {
	if !(INT24_MIN..=INT24_MAX).contains(&value) {
		return Err(Error::OutOfRange(format!("{value} does not fit in 24 bits")));
	}
	write_u24(dst, (value as u32) & UINT24_MAX, endianness)
}

/// Batch methods for plain-old-data types: copy the run, then swap each `$lane`-byte component.
macro_rules! pod_batch {
	($lane:expr) => {
		fn decode_many(src: &[u8], endianness: $crate::Endianness, dst: &mut [Self]) -> $crate::Result<()> {
			let bytes: &mut [u8] = bytemuck::cast_slice_mut(dst);
			$crate::primitive::put(bytes, src)?;
			if endianness.needs_swap() {
				$crate::endian::swap_lanes(bytes, $lane);
			}
			Ok(())
		}

		fn decode_vec(src: &[u8], endianness: $crate::Endianness, count: usize) -> $crate::Result<Vec<Self>> {
			let required = $crate::primitive::run_len(count, <Self as $crate::Primitive>::SIZE)?;
			if src.len() != required {
				return Err($crate::Error::Size { required, actual: src.len() });
			}
			let mut out = vec![<Self as bytemuck::Zeroable>::zeroed(); count];
			Self::decode_many(src, endianness, &mut out)?;
			Ok(out)
		}

		fn encode_many(values: &[Self], endianness: $crate::Endianness, dst: &mut [u8]) -> $crate::Result<()> {
			$crate::primitive::put(dst, bytemuck::cast_slice(values))?;
			if endianness.needs_swap() {
				$crate::endian::swap_lanes(dst, $lane);
			}
			Ok(())
		}
	};
}

/// Scalar methods for plain-old-data aggregates of `$lane`-byte components.
macro_rules! pod_scalar {
	($lane:expr) => {
		fn decode(src: &[u8], endianness: $crate::Endianness) -> $crate::Result<Self> {
			let mut value = <Self as bytemuck::Zeroable>::zeroed();
			let bytes = bytemuck::bytes_of_mut(&mut value);
			$crate::primitive::put(bytes, src)?;
			if endianness.needs_swap() {
				$crate::endian::swap_lanes(bytes, $lane);
			}
			Ok(value)
		}

		fn encode(self, dst: &mut [u8], endianness: $crate::Endianness) -> $crate::Result<()> {
			$crate::primitive::put(dst, bytemuck::bytes_of(&self))?;
			if endianness.needs_swap() {
				$crate::endian::swap_lanes(dst, $lane);
			}
			Ok(())
		}
	};
}

pub(crate) use {pod_batch, pod_scalar};

macro_rules! impl_int {
	($($t:ident)*) => {$(
		impl Primitive for $t {
			const SIZE: usize = size_of::<$t>();

			#[inline]
			fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
				let buf = fixed(src)?;
				Ok(match endianness {
					Endianness::LittleEndian => Self::from_le_bytes(buf),
					Endianness::BigEndian => Self::from_be_bytes(buf),
				})
			}

			#[inline]
			fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
				match endianness {
					Endianness::LittleEndian => put(dst, &self.to_le_bytes()),
					Endianness::BigEndian => put(dst, &self.to_be_bytes()),
				}
			}

			pod_batch!(size_of::<$t>());
		}
	)*};
}

impl_int!(u8 u16 u32 u64 u128 i8 i16 i32 i64 i128);

impl Primitive for f16 {
	const SIZE: usize = 2;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		u16::decode(src, endianness).map(Self::from_bits)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		self.to_bits().encode(dst, endianness)
	}

	pod_batch!(2);
}

impl Primitive for f32 {
	const SIZE: usize = 4;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		u32::decode(src, endianness).map(Self::from_bits)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		self.to_bits().encode(dst, endianness)
	}

	pod_batch!(4);
}

impl Primitive for f64 {
	const SIZE: usize = 8;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		u64::decode(src, endianness).map(Self::from_bits)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		self.to_bits().encode(dst, endianness)
	}

	pod_batch!(8);
}
