use std::io::{Seek, SeekFrom, Write};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use half::f16;

use crate::attrs::FieldConfig;
use crate::field::Field;
use crate::primitive::{self, run_len, Primitive, INT24_SIZE};
use crate::{BooleanSize, Decimal, Endianness, Matrix4x4, Quaternion, Result, Settings, StringEncoding, Vector2, Vector3, Vector4};

/// Returns the first `len` bytes of the scratch buffer, growing it if needed.
fn scratch(buf: &mut Vec<u8>, len: usize) -> &mut [u8] {
	if buf.len() < len {
		buf.resize(len, 0);
	}
	&mut buf[..len]
}

/**
	Writes primitives, strings and whole objects to a byte stream.

	Values are encoded into a scratch buffer first, so a value that cannot be encoded leaves the stream untouched.

	## Examples

	```
	use binrec::Writer;

	let mut writer = Writer::new(vec![]);
	writer.write_u8(42).unwrap();
	writer.write_bool(true).unwrap();
	writer.write_u32(754187983).unwrap();
	assert_eq!(writer.into_inner(), b"\x2a\x01\xcf\xfe\xf3\x2c");
	```
*/
#[derive(Debug)]
pub struct Writer<W> {
	stream: W,
	settings: Settings,
	scratch: Vec<u8>,
}

impl<W> Writer<W> {
	/// Creates a writer with the default settings: little endian, ASCII, one-byte booleans.
	pub fn new(stream: W) -> Self {
		Self::with_settings(stream, Settings::new())
	}

	pub fn with_settings(stream: W, settings: Settings) -> Self {
		Self { stream, settings, scratch: Vec::new() }
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn settings_mut(&mut self) -> &mut Settings {
		&mut self.settings
	}

	pub fn get_ref(&self) -> &W {
		&self.stream
	}

	pub fn get_mut(&mut self) -> &mut W {
		&mut self.stream
	}

	pub fn into_inner(self) -> W {
		self.stream
	}
}

impl<W: Write> Writer<W> {
	pub fn flush(&mut self) -> Result<()> {
		self.stream.flush()?;
		Ok(())
	}

	pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
		self.stream.write_all(bytes)?;
		Ok(())
	}

	pub fn write<T: Primitive>(&mut self, value: T) -> Result<()> {
		self.write_as(value, self.settings.endianness)
	}

	pub fn write_as<T: Primitive>(&mut self, value: T, endianness: Endianness) -> Result<()> {
		let buf = scratch(&mut self.scratch, T::SIZE);
		value.encode(buf, endianness)?;
		self.stream.write_all(buf)?;
		Ok(())
	}

	/// Writes `values` consecutively in one batch.
	pub fn write_many<T: Primitive>(&mut self, values: &[T]) -> Result<()> {
		self.write_many_as(values, self.settings.endianness)
	}

	pub fn write_many_as<T: Primitive>(&mut self, values: &[T], endianness: Endianness) -> Result<()> {
		if values.is_empty() {
			return Ok(());
		}
		let buf = scratch(&mut self.scratch, run_len(values.len(), T::SIZE)?);
		primitive::write_many(buf, values, endianness)?;
		self.stream.write_all(buf)?;
		Ok(())
	}

	/// Writes a boolean of the writer's boolean width.
	pub fn write_bool(&mut self, value: bool) -> Result<()> {
		self.write_bool_sized(value, self.settings.boolean_size)
	}

	pub fn write_bool_sized(&mut self, value: bool, size: BooleanSize) -> Result<()> {
		self.write_bool_as(value, size, self.settings.endianness)
	}

	pub fn write_bool_as(&mut self, value: bool, size: BooleanSize, endianness: Endianness) -> Result<()> {
		let buf = scratch(&mut self.scratch, size.size());
		primitive::write_bool(buf, value, size, endianness)?;
		self.stream.write_all(buf)?;
		Ok(())
	}

	pub fn write_bools(&mut self, values: &[bool]) -> Result<()> {
		self.write_bools_as(values, self.settings.boolean_size, self.settings.endianness)
	}

	pub fn write_bools_as(&mut self, values: &[bool], size: BooleanSize, endianness: Endianness) -> Result<()> {
		if values.is_empty() {
			return Ok(());
		}
		let buf = scratch(&mut self.scratch, run_len(values.len(), size.size())?);
		primitive::write_bools(buf, values, size, endianness)?;
		self.stream.write_all(buf)?;
		Ok(())
	}

	/// Writes a signed 24-bit integer.
	pub fn write_i24(&mut self, value: i32) -> Result<()> {
		self.write_i24_as(value, self.settings.endianness)
	}

	pub fn write_i24_as(&mut self, value: i32, endianness: Endianness) -> Result<()> {
		let buf = scratch(&mut self.scratch, INT24_SIZE);
		primitive::write_i24(buf, value, endianness)?;
		self.stream.write_all(buf)?;
		Ok(())
	}

	/// Writes an unsigned 24-bit integer.
	pub fn write_u24(&mut self, value: u32) -> Result<()> {
		self.write_u24_as(value, self.settings.endianness)
	}

	pub fn write_u24_as(&mut self, value: u32, endianness: Endianness) -> Result<()> {
		let buf = scratch(&mut self.scratch, INT24_SIZE);
		primitive::write_u24(buf, value, endianness)?;
		self.stream.write_all(buf)?;
		Ok(())
	}

	/// Writes one character in the writer's encoding.
	pub fn write_char(&mut self, c: char) -> Result<()> {
		self.write_char_as(c, self.settings.encoding)
	}

	pub fn write_char_as(&mut self, c: char, encoding: StringEncoding) -> Result<()> {
		self.scratch.clear();
		encoding.encode_char(c, &mut self.scratch);
		self.stream.write_all(&self.scratch)?;
		Ok(())
	}

	pub fn write_chars(&mut self, chars: &[char]) -> Result<()> {
		let encoding = self.settings.encoding;
		self.scratch.clear();
		for &c in chars {
			encoding.encode_char(c, &mut self.scratch);
		}
		self.stream.write_all(&self.scratch)?;
		Ok(())
	}

	/// Writes the characters of `s` without any framing.
	pub fn write_str(&mut self, s: &str) -> Result<()> {
		self.write_str_as(s, self.settings.encoding)
	}

	pub fn write_str_as(&mut self, s: &str, encoding: StringEncoding) -> Result<()> {
		self.scratch.clear();
		encoding.encode(s, &mut self.scratch);
		self.stream.write_all(&self.scratch)?;
		Ok(())
	}

	/**
		Writes `s` as exactly `units` code units.

		Longer strings are cut after the last character that fits whole, shorter ones are padded with terminators.

		## Examples

		```
		use binrec::Writer;

		let mut writer = Writer::new(vec![]);
		writer.write_string("Kermalis", 4).unwrap();
		writer.write_string("Ke", 4).unwrap();
		assert_eq!(writer.into_inner(), b"KermKe\0\0");
		```
	*/
	pub fn write_string(&mut self, s: &str, units: usize) -> Result<()> {
		self.write_string_as(s, units, self.settings.encoding)
	}

	pub fn write_string_as(&mut self, s: &str, units: usize, encoding: StringEncoding) -> Result<()> {
		if units == 0 {
			return Ok(());
		}
		run_len(units, encoding.unit_size())?;
		self.scratch.clear();
		encoding.encode_fitted(s, units, &mut self.scratch);
		self.stream.write_all(&self.scratch)?;
		Ok(())
	}

	/// Writes `s` followed by one terminator code unit.
	pub fn write_string_null_terminated(&mut self, s: &str) -> Result<()> {
		self.write_string_null_terminated_as(s, self.settings.encoding)
	}

	pub fn write_string_null_terminated_as(&mut self, s: &str, encoding: StringEncoding) -> Result<()> {
		self.scratch.clear();
		encoding.encode(s, &mut self.scratch);
		let end = self.scratch.len() + encoding.unit_size();
		self.scratch.resize(end, 0);
		self.stream.write_all(&self.scratch)?;
		Ok(())
	}

	/// Writes each string as exactly `units` code units.
	pub fn write_strings<S: AsRef<str>>(&mut self, strings: &[S], units: usize) -> Result<()> {
		let encoding = self.settings.encoding;
		strings.iter().try_for_each(|s| self.write_string_as(s.as_ref(), units, encoding))
	}

	pub fn write_strings_null_terminated<S: AsRef<str>>(&mut self, strings: &[S]) -> Result<()> {
		let encoding = self.settings.encoding;
		strings.iter().try_for_each(|s| self.write_string_null_terminated_as(s.as_ref(), encoding))
	}
}

impl<W: Write + Seek> Writer<W> {
	pub fn position(&mut self) -> Result<u64> {
		Ok(self.stream.stream_position()?)
	}

	/// Moves to an absolute position.
	pub fn seek(&mut self, offset: u64) -> Result<()> {
		log::trace!("seeking to {offset:#x}");
		self.stream.seek(SeekFrom::Start(offset))?;
		Ok(())
	}

	pub fn write_at<T: Primitive>(&mut self, offset: u64, value: T) -> Result<()> {
		self.seek(offset)?;
		self.write(value)
	}

	pub fn write_many_at<T: Primitive>(&mut self, offset: u64, values: &[T]) -> Result<()> {
		self.seek(offset)?;
		self.write_many(values)
	}

	/**
		Writes any [`Field`] type on its own: a primitive, a string, a fixed-size array, or an object.

		Strings written this way are null-terminated. Use [`Writer::write_objects`] for runs.
	*/
	pub fn write_object<T: Field>(&mut self, value: &T) -> Result<()> {
		let config = FieldConfig::root(std::any::type_name::<T>(), self.settings);
		value.write_field(self, &config)
	}

	pub fn write_object_at<T: Field>(&mut self, offset: u64, value: &T) -> Result<()> {
		self.seek(offset)?;
		self.write_object(value)
	}

	pub fn write_objects<T: Field>(&mut self, values: &[T]) -> Result<()> {
		let config = FieldConfig::root(std::any::type_name::<T>(), self.settings);
		T::write_run(values, self, &config)
	}
}

macro_rules! named_writes {
	($($t:ty => $one:ident, $many:ident, $at:ident;)*) => {
		impl<W: Write> Writer<W> {$(
			#[inline]
			pub fn $one(&mut self, value: $t) -> Result<()> {
				self.write(value)
			}

			#[inline]
			pub fn $many(&mut self, values: &[$t]) -> Result<()> {
				self.write_many(values)
			}
		)*}

		impl<W: Write + Seek> Writer<W> {$(
			#[inline]
			pub fn $at(&mut self, offset: u64, value: $t) -> Result<()> {
				self.write_at(offset, value)
			}
		)*}
	};
}

named_writes! {
	u8 => write_u8, write_u8s, write_u8_at;
	i8 => write_i8, write_i8s, write_i8_at;
	u16 => write_u16, write_u16s, write_u16_at;
	i16 => write_i16, write_i16s, write_i16_at;
	u32 => write_u32, write_u32s, write_u32_at;
	i32 => write_i32, write_i32s, write_i32_at;
	u64 => write_u64, write_u64s, write_u64_at;
	i64 => write_i64, write_i64s, write_i64_at;
	u128 => write_u128, write_u128s, write_u128_at;
	i128 => write_i128, write_i128s, write_i128_at;
	f16 => write_f16, write_f16s, write_f16_at;
	f32 => write_f32, write_f32s, write_f32_at;
	f64 => write_f64, write_f64s, write_f64_at;
	Decimal => write_decimal, write_decimals, write_decimal_at;
	NaiveDateTime => write_datetime, write_datetimes, write_datetime_at;
	NaiveDate => write_date, write_dates, write_date_at;
	NaiveTime => write_time, write_times, write_time_at;
	Vector2 => write_vector2, write_vector2s, write_vector2_at;
	Vector3 => write_vector3, write_vector3s, write_vector3_at;
	Vector4 => write_vector4, write_vector4s, write_vector4_at;
	Quaternion => write_quaternion, write_quaternions, write_quaternion_at;
	Matrix4x4 => write_matrix4x4, write_matrix4x4s, write_matrix4x4_at;
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;
	use crate::Error;

	#[test]
	fn write_be_forced() {
		let mut writer = Writer::new(vec![]);
		writer.write_as(0xbaad_u16, Endianness::BigEndian).unwrap();
		assert_eq!(writer.into_inner(), b"\xba\xad");
	}

	#[test]
	fn write_le_ambient() {
		let mut writer = Writer::new(vec![]);
		writer.write_u16(0xbaad).unwrap();
		assert_eq!(writer.into_inner(), b"\xad\xba");
	}

	#[test]
	fn failed_encode_writes_nothing() {
		let mut writer = Writer::new(vec![]);
		writer.write_u8(1).unwrap();
		assert!(matches!(writer.write_i24(0x80_0000), Err(Error::OutOfRange(_))));
		assert_eq!(writer.into_inner(), [1]);
	}

	#[test]
	fn null_terminated_appends_one_unit() {
		let mut writer = Writer::new(vec![]);
		writer.write_string_null_terminated("EndianBinaryIO").unwrap();
		writer.write_string_null_terminated_as("Ke", StringEncoding::Utf16).unwrap();
		assert_eq!(writer.into_inner(), b"EndianBinaryIO\0K\0e\0\0\0");
	}

	#[test]
	fn fixed_strings_pad_and_truncate() {
		let mut writer = Writer::new(vec![]);
		writer.write_string_as("Kermalis", 10, StringEncoding::Utf16).unwrap();
		writer.write_strings(&["abc", "d"], 2).unwrap();
		assert_eq!(writer.into_inner(), b"K\0e\0r\0m\0a\0l\0i\0s\0\0\0\0\0abd\0");
	}

	#[test]
	fn big_endian_utf16_chars() {
		let mut writer = Writer::new(vec![]);
		writer.write_char_as('K', StringEncoding::Utf16BE).unwrap();
		writer.settings_mut().encoding = StringEncoding::Utf32;
		writer.write_chars(&['A']).unwrap();
		assert_eq!(writer.into_inner(), b"\0KA\0\0\0");
	}

	#[test]
	fn sized_bools() {
		let mut writer = Writer::new(vec![]);
		writer.write_bool_sized(true, BooleanSize::U16).unwrap();
		writer.settings_mut().boolean_size = BooleanSize::U32;
		writer.write_bools(&[false]).unwrap();
		assert_eq!(writer.into_inner(), [1, 0, 0, 0, 0, 0]);
	}

	#[test]
	fn batch_writes() {
		let mut writer = Writer::new(vec![]);
		writer.write_u32s(&[1, 2]).unwrap();
		writer.write_u16s(&[]).unwrap();
		assert_eq!(writer.into_inner(), [1, 0, 0, 0, 2, 0, 0, 0]);
	}

	#[test]
	fn write_at_offset() {
		let mut writer = Writer::new(Cursor::new(vec![0; 4]));
		writer.write_u16_at(2, 0x0102).unwrap();
		assert_eq!(writer.position().unwrap(), 4);
		assert_eq!(writer.into_inner().into_inner(), [0, 0, 2, 1]);
	}
}
