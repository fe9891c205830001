use std::fmt;

use crate::primitive::Primitive;
use crate::{Endianness, Error, Result};

const SIGN_MASK: u32 = 0x8000_0000;
const SCALE_MASK: u32 = 0x00ff_0000;
const SCALE_SHIFT: u32 = 16;
const MANTISSA_MAX: u128 = (1 << 96) - 1;

/**
	A 128-bit decimal floating point number: a 96-bit magnitude, a sign, and a power-of-ten scale of 0 to 28.

	On the wire it is four 32-bit groups, `lo`, `mid`, `hi` and `flags`, each in the stream's byte order. Not every bit pattern is a legal decimal, so decoding validates the flags group.

	Equality compares representations: `1.0` and `1.00` are different values.

	## Examples

	```
	use binrec::Decimal;

	let price = Decimal::new(-12345, 2).unwrap();
	assert_eq!(price.to_string(), "-123.45");
	assert_eq!(price.scale(), 2);
	assert!(Decimal::from_bits([0, 0, 0, 0x001d_0000]).is_err());
	```
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Decimal {
	lo: u32,
	mid: u32,
	hi: u32,
	flags: u32,
}

impl Decimal {
	pub const ZERO: Self = Self { lo: 0, mid: 0, hi: 0, flags: 0 };
	pub const MAX_SCALE: u32 = 28;

	/// Creates `mantissa * 10^-scale`.
	///
	/// # Errors
	///
	/// Returns [`Error::OutOfRange`] if the magnitude needs more than 96 bits or the scale exceeds 28.
	pub fn new(mantissa: i128, scale: u32) -> Result<Self> {
		let magnitude = mantissa.unsigned_abs();
		if magnitude > MANTISSA_MAX {
			return Err(Error::OutOfRange(format!("decimal mantissa {mantissa} exceeds 96 bits")));
		}
		if scale > Self::MAX_SCALE {
			return Err(Error::OutOfRange(format!("decimal scale {scale} exceeds {}", Self::MAX_SCALE)));
		}
		let sign = if mantissa < 0 { SIGN_MASK } else { 0 };
		Ok(Self {
			lo: magnitude as u32,
			mid: (magnitude >> 32) as u32,
			hi: (magnitude >> 64) as u32,
			flags: sign | (scale << SCALE_SHIFT),
		})
	}

	/// Creates a decimal from its four 32-bit groups in `lo, mid, hi, flags` order.
	///
	/// # Errors
	///
	/// Returns [`Error::Format`] if the flags group has reserved bits set or a scale above 28.
	pub fn from_bits(bits: [i32; 4]) -> Result<Self> {
		let [lo, mid, hi, flags] = bits.map(|b| b as u32);
		let reserved = flags & !(SIGN_MASK | SCALE_MASK);
		let scale = (flags & SCALE_MASK) >> SCALE_SHIFT;
		if reserved != 0 || scale > Self::MAX_SCALE {
			return Err(Error::Format(format!("{flags:#010x} is not a valid decimal flags group")));
		}
		Ok(Self { lo, mid, hi, flags })
	}

	/// The four 32-bit groups in `lo, mid, hi, flags` order.
	pub const fn to_bits(self) -> [i32; 4] {
		[self.lo as i32, self.mid as i32, self.hi as i32, self.flags as i32]
	}

	/// Signed mantissa; the value is `mantissa() * 10^-scale()`.
	pub fn mantissa(self) -> i128 {
		let magnitude = (u128::from(self.hi) << 64) | (u128::from(self.mid) << 32) | u128::from(self.lo);
		if self.is_negative() { -(magnitude as i128) } else { magnitude as i128 }
	}

	pub const fn scale(self) -> u32 {
		(self.flags & SCALE_MASK) >> SCALE_SHIFT
	}

	pub const fn is_negative(self) -> bool {
		self.flags & SIGN_MASK != 0
	}
}

impl From<i64> for Decimal {
	fn from(value: i64) -> Self {
		let magnitude = u128::from(value.unsigned_abs());
		Self {
			lo: magnitude as u32,
			mid: (magnitude >> 32) as u32,
			hi: 0,
			flags: if value < 0 { SIGN_MASK } else { 0 },
		}
	}
}

impl fmt::Display for Decimal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let digits = self.mantissa().unsigned_abs().to_string();
		let scale = self.scale() as usize;
		let sign = if self.is_negative() { "-" } else { "" };
		if scale == 0 {
			return write!(f, "{sign}{digits}");
		}
		let digits = format!("{digits:0>width$}", width = scale + 1);
		let (int, frac) = digits.split_at(digits.len() - scale);
		write!(f, "{sign}{int}.{frac}")
	}
}

impl Primitive for Decimal {
	const SIZE: usize = 16;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		let mut bits = [0i32; 4];
		crate::primitive::read_many(src, endianness, &mut bits)?;
		Self::from_bits(bits)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		crate::primitive::write_many(dst, &self.to_bits(), endianness)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::primitive::{read, write};

	#[test]
	fn groups_swap_independently() {
		let value = Decimal::new(0x0102_0304, 3).unwrap();
		let mut le = [0; 16];
		let mut be = [0; 16];
		write(&mut le, value, Endianness::LittleEndian).unwrap();
		write(&mut be, value, Endianness::BigEndian).unwrap();
		assert_eq!(&le[..4], &[4, 3, 2, 1]);
		assert_eq!(&be[..4], &[1, 2, 3, 4]);
		assert_eq!(&le[12..], &[0, 0, 3, 0]);
		assert_eq!(&be[12..], &[0, 3, 0, 0]);
		assert_eq!(read::<Decimal>(&be, Endianness::BigEndian).unwrap(), value);
	}

	#[test]
	fn invalid_flags_are_format_errors() {
		let mut bytes = [0; 16];
		bytes[12] = 1;
		assert!(matches!(read::<Decimal>(&bytes, Endianness::LittleEndian), Err(Error::Format(_))));
		bytes[12] = 0;
		bytes[14] = 29;
		assert!(matches!(read::<Decimal>(&bytes, Endianness::LittleEndian), Err(Error::Format(_))));
	}

	#[test]
	fn display() {
		assert_eq!(Decimal::new(5, 3).unwrap().to_string(), "0.005");
		assert_eq!(Decimal::from(-42).to_string(), "-42");
		assert_eq!(Decimal::new(i128::from(u64::MAX) * 1000, 28).unwrap().mantissa(), i128::from(u64::MAX) * 1000);
	}

	#[test]
	fn new_rejects_wide_mantissa() {
		assert!(Decimal::new(1 << 96, 0).is_err());
		assert!(Decimal::new(1, 29).is_err());
	}
}
