use crate::{ConfigError, Endianness, StringEncoding};

/// How many bytes a logical boolean occupies on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanSize {
	#[default]
	U8,
	U16,
	U32,
}

impl BooleanSize {
	/// Width in bytes.
	pub const fn size(self) -> usize {
		match self {
			Self::U8 => 1,
			Self::U16 => 2,
			Self::U32 => 4,
		}
	}
}

impl TryFrom<u32> for BooleanSize {
	type Error = ConfigError;

	/// Converts a byte width (1, 2 or 4) into a `BooleanSize`.
	fn try_from(width: u32) -> Result<Self, Self::Error> {
		match width {
			1 => Ok(Self::U8),
			2 => Ok(Self::U16),
			4 => Ok(Self::U32),
			x => Err(ConfigError::InvalidBooleanSize(x)),
		}
	}
}

/**
	Ambient settings of a [`Reader`](crate::Reader) or [`Writer`](crate::Writer).

	Field metadata can override the encoding and boolean width for a single field. Such overrides are threaded into nested objects as their defaults and never leak into sibling fields.

	## Examples

	```
	use binrec::{BooleanSize, Endianness, Settings, StringEncoding};

	let settings = Settings::new()
		.with_endianness(Endianness::BigEndian)
		.with_boolean_size(BooleanSize::U32);
	assert_eq!(settings.encoding, StringEncoding::Ascii);
	assert_eq!(settings.boolean_size.size(), 4);
	```
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
	pub endianness: Endianness,
	pub encoding: StringEncoding,
	pub boolean_size: BooleanSize,
}

impl Settings {
	/// Little endian, ASCII, one-byte booleans.
	pub const fn new() -> Self {
		Self {
			endianness: Endianness::LittleEndian,
			encoding: StringEncoding::Ascii,
			boolean_size: BooleanSize::U8,
		}
	}

	#[must_use]
	pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
		self.endianness = endianness;
		self
	}

	#[must_use]
	pub const fn with_encoding(mut self, encoding: StringEncoding) -> Self {
		self.encoding = encoding;
		self
	}

	#[must_use]
	pub const fn with_boolean_size(mut self, boolean_size: BooleanSize) -> Self {
		self.boolean_size = boolean_size;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn boolean_size_from_width() {
		assert_eq!(BooleanSize::try_from(2), Ok(BooleanSize::U16));
		assert_eq!(BooleanSize::try_from(3), Err(ConfigError::InvalidBooleanSize(3)));
	}

	#[test]
	fn const_default_matches_default() {
		assert_eq!(Settings::new(), Settings::default());
	}
}
