/**
	Byte order of multi-byte values on the wire.

	Readers and writers carry one of these as part of their [`Settings`](crate::Settings). Whenever the requested byte order differs from [`Endianness::NATIVE`], every primitive-sized lane is byte-reversed before decoding or after encoding.

	## Examples

	```
	use binrec::Endianness;

	let swap = Endianness::NATIVE != Endianness::BigEndian;
	assert_eq!(Endianness::BigEndian.needs_swap(), swap);
	assert!(!Endianness::NATIVE.needs_swap());
	```
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endianness {
	/// Least significant byte first.
	#[default]
	LittleEndian,
	/// Most significant byte first.
	BigEndian,
}

impl Endianness {
	/// Byte order of the host, computed at compile time.
	#[cfg(target_endian = "little")]
	pub const NATIVE: Self = Self::LittleEndian;
	/// Byte order of the host, computed at compile time.
	#[cfg(target_endian = "big")]
	pub const NATIVE: Self = Self::BigEndian;

	/// Whether values in this byte order have to be reversed to match the host.
	#[inline]
	pub const fn needs_swap(self) -> bool {
		!matches!((self, Self::NATIVE), (Self::LittleEndian, Self::LittleEndian) | (Self::BigEndian, Self::BigEndian))
	}
}

/// Reverses every `width`-sized lane of `bytes` in place.
///
/// `bytes.len()` must be a multiple of `width`.
#[inline]
pub(crate) fn swap_lanes(bytes: &mut [u8], width: usize) {
	debug_assert_eq!(bytes.len() % width, 0, "lane width must divide the buffer");
	match width {
		0 | 1 => {}
		2 => for lane in bytes.chunks_exact_mut(2) { lane.swap(0, 1); },
		_ => for lane in bytes.chunks_exact_mut(width) { lane.reverse(); },
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn native_never_swaps() {
		assert!(!Endianness::NATIVE.needs_swap());
	}

	#[test]
	fn exactly_one_order_swaps() {
		assert_ne!(Endianness::LittleEndian.needs_swap(), Endianness::BigEndian.needs_swap());
	}

	#[test]
	fn swap_lanes_reverses_each_lane() {
		let mut data = [1, 2, 3, 4, 5, 6, 7, 8];
		swap_lanes(&mut data, 4);
		assert_eq!(data, [4, 3, 2, 1, 8, 7, 6, 5]);
		swap_lanes(&mut data, 2);
		assert_eq!(data, [3, 4, 1, 2, 7, 8, 5, 6]);
	}

	#[test]
	fn default_is_little_endian() {
		assert_eq!(Endianness::default(), Endianness::LittleEndian);
	}
}
