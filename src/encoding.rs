//! Text encodings and string framing.
//!
//! Lengths of strings on the wire are counted in code units: one byte for
//! ASCII and UTF-8, two for UTF-16, four for UTF-32. A code unit of all zero
//! bytes is the terminator.

use crate::{Error, Result};

/// Text encoding of characters and strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringEncoding {
	/// 7-bit ASCII; other bytes decode as `'?'` and non-ASCII characters encode as `'?'`.
	#[default]
	Ascii,
	Utf8,
	/// UTF-16 with little-endian code units.
	Utf16,
	/// UTF-16 with big-endian code units.
	Utf16BE,
	/// UTF-32 with little-endian code units.
	Utf32,
}

impl StringEncoding {
	/// Width of one code unit in bytes.
	pub const fn unit_size(self) -> usize {
		match self {
			Self::Ascii | Self::Utf8 => 1,
			Self::Utf16 | Self::Utf16BE => 2,
			Self::Utf32 => 4,
		}
	}

	/// Appends the encoding of `c` to `out`.
	pub fn encode_char(self, c: char, out: &mut Vec<u8>) {
		match self {
			Self::Ascii => out.push(if c.is_ascii() { c as u8 } else { b'?' }),
			Self::Utf8 => out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
			Self::Utf16 => {
				for unit in c.encode_utf16(&mut [0; 2]) {
					out.extend_from_slice(&unit.to_le_bytes());
				}
			}
			Self::Utf16BE => {
				for unit in c.encode_utf16(&mut [0; 2]) {
					out.extend_from_slice(&unit.to_be_bytes());
				}
			}
			Self::Utf32 => out.extend_from_slice(&u32::from(c).to_le_bytes()),
		}
	}

	/// Appends the encoding of `s` to `out`.
	pub fn encode(self, s: &str, out: &mut Vec<u8>) {
		match self {
			Self::Utf8 => out.extend_from_slice(s.as_bytes()),
			_ => {
				out.reserve(s.len() * self.unit_size());
				for c in s.chars() {
					self.encode_char(c, out);
				}
			}
		}
	}

	/// Appends exactly `units` code units to `out`: `s` cut at the last whole character that fits, then padded with terminators.
	pub fn encode_fitted(self, s: &str, units: usize, out: &mut Vec<u8>) {
		let unit_size = self.unit_size();
		let end = out.len() + units * unit_size;
		let mut buf = Vec::with_capacity(4);
		for c in s.chars() {
			buf.clear();
			self.encode_char(c, &mut buf);
			if out.len() + buf.len() > end {
				break;
			}
			out.extend_from_slice(&buf);
		}
		out.resize(end, 0);
	}

	/// Number of code units of the character whose first unit is `first`.
	///
	/// # Errors
	///
	/// Returns [`Error::Format`] if `first` cannot start a character.
	pub fn char_units(self, first: &[u8]) -> Result<usize> {
		match self {
			Self::Ascii | Self::Utf32 => Ok(1),
			Self::Utf8 => match first[0] {
				0x00..=0x7f => Ok(1),
				0xc2..=0xdf => Ok(2),
				0xe0..=0xef => Ok(3),
				0xf0..=0xf4 => Ok(4),
				b => Err(Error::Format(format!("{b:#04x} cannot start a UTF-8 character"))),
			},
			Self::Utf16 | Self::Utf16BE => {
				let unit = self.utf16_unit(first);
				Ok(if (0xd800..0xdc00).contains(&unit) { 2 } else { 1 })
			}
		}
	}

	/// Whether a code unit is the terminator.
	pub fn is_terminator(unit: &[u8]) -> bool {
		unit.iter().all(|&b| b == 0)
	}

	fn utf16_unit(self, bytes: &[u8]) -> u16 {
		let pair = [bytes[0], bytes[1]];
		match self {
			Self::Utf16BE => u16::from_be_bytes(pair),
			_ => u16::from_le_bytes(pair),
		}
	}

	/// Decodes whole code units.
	///
	/// # Errors
	///
	/// Returns [`Error::Format`] for malformed UTF-8, UTF-16 or UTF-32 data, or if `bytes` is not a whole number of code units.
	pub fn decode(self, bytes: &[u8]) -> Result<String> {
		if bytes.len() % self.unit_size() != 0 {
			return Err(Error::Format(format!("{} bytes are not a whole number of {:?} code units", bytes.len(), self)));
		}
		match self {
			Self::Ascii => Ok(bytes.iter().map(|&b| if b.is_ascii() { char::from(b) } else { '?' }).collect()),
			Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| Error::Format(e.to_string())),
			Self::Utf16 | Self::Utf16BE => {
				let units = bytes.chunks_exact(2).map(|pair| self.utf16_unit(pair));
				char::decode_utf16(units)
					.collect::<std::result::Result<String, _>>()
					.map_err(|e| Error::Format(e.to_string()))
			}
			Self::Utf32 => bytes
				.chunks_exact(4)
				.map(|unit| {
					let code = u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]]);
					char::from_u32(code).ok_or_else(|| Error::Format(format!("{code:#x} is not a valid character")))
				})
				.collect(),
		}
	}

	/// Decodes exactly one character.
	///
	/// # Errors
	///
	/// Returns [`Error::Format`] unless `bytes` is the encoding of a single character.
	pub fn decode_char(self, bytes: &[u8]) -> Result<char> {
		let s = self.decode(bytes)?;
		let mut chars = s.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => Ok(c),
			_ => Err(Error::Format(format!("{} bytes do not encode a single character", bytes.len()))),
		}
	}
}

/// Cuts `bytes` at the first terminator code unit; nothing after it is inspected.
pub fn trim_terminators(encoding: StringEncoding, bytes: &[u8]) -> &[u8] {
	let unit_size = encoding.unit_size();
	let end = bytes
		.chunks_exact(unit_size)
		.position(StringEncoding::is_terminator)
		.map_or(bytes.len(), |units| units * unit_size);
	&bytes[..end]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ascii_is_lossy() {
		let mut out = vec![];
		StringEncoding::Ascii.encode("né", &mut out);
		assert_eq!(out, b"n?");
		assert_eq!(StringEncoding::Ascii.decode(b"a\xffb").unwrap(), "a?b");
	}

	#[test]
	fn utf16_orders() {
		let mut le = vec![];
		let mut be = vec![];
		StringEncoding::Utf16.encode("Ke", &mut le);
		StringEncoding::Utf16BE.encode("Ke", &mut be);
		assert_eq!(le, b"K\0e\0");
		assert_eq!(be, b"\0K\0e");
		assert_eq!(StringEncoding::Utf16BE.decode(&be).unwrap(), "Ke");
	}

	#[test]
	fn surrogate_pairs() {
		let mut out = vec![];
		StringEncoding::Utf16.encode_char('😀', &mut out);
		assert_eq!(out.len(), 4);
		assert_eq!(StringEncoding::Utf16.char_units(&out[..2]).unwrap(), 2);
		assert_eq!(StringEncoding::Utf16.decode_char(&out).unwrap(), '😀');
		assert!(matches!(StringEncoding::Utf16.decode(&out[..2]), Err(Error::Format(_))));
	}

	#[test]
	fn utf8_char_units() {
		assert_eq!(StringEncoding::Utf8.char_units(b"\xe2").unwrap(), 3);
		assert!(StringEncoding::Utf8.char_units(b"\x80").is_err());
	}

	#[test]
	fn utf32_rejects_invalid_scalars() {
		assert_eq!(StringEncoding::Utf32.decode(b"A\0\0\0").unwrap(), "A");
		assert!(StringEncoding::Utf32.decode(b"\0\xd8\0\0").is_err());
	}

	#[test]
	fn fitted_truncates_and_pads() {
		let mut out = vec![];
		StringEncoding::Ascii.encode_fitted("Kermalis", 4, &mut out);
		assert_eq!(out, b"Kerm");
		out.clear();
		StringEncoding::Utf16.encode_fitted("Ke", 4, &mut out);
		assert_eq!(out, b"K\0e\0\0\0\0\0");
	}

	#[test]
	fn fitted_never_splits_a_character() {
		let mut out = vec![];
		StringEncoding::Utf8.encode_fitted("aé", 2, &mut out);
		assert_eq!(out, b"a\0");
	}

	#[test]
	fn trim_stops_at_first_terminator() {
		assert_eq!(trim_terminators(StringEncoding::Utf16, b"K\0e\0\0\0x\0"), b"K\0e\0");
		assert_eq!(trim_terminators(StringEncoding::Ascii, b"abc"), b"abc");
	}
}
