use std::io::{Read, Seek, SeekFrom};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use half::f16;

use crate::attrs::FieldConfig;
use crate::encoding::trim_terminators;
use crate::field::Field;
use crate::primitive::{self, run_len, Primitive, INT24_SIZE};
use crate::{BooleanSize, Decimal, Endianness, Error, Matrix4x4, Quaternion, Result, Settings, StringEncoding, Vector2, Vector3, Vector4};

/**
	Reads primitives, strings and whole objects from a byte stream.

	The reader owns the stream and a scratch buffer that grows to the largest run read so far. Both are released when the reader is dropped; [`Reader::into_inner`] hands the stream back instead.

	Every read uses the byte order, encoding and boolean width of the reader's [`Settings`] unless an `_as` variant is used.

	Reads of a zero-length run return an empty result without touching the stream.

	## Examples

	```
	use binrec::{Endianness, Reader, Settings};

	let data = b"\x2a\x01\xcf\xfe\xf3\x2c";
	let mut reader = Reader::new(&data[..]);
	assert_eq!(reader.read_u8().unwrap(), 42);
	assert_eq!(reader.read_bool().unwrap(), true);
	assert_eq!(reader.read_u32().unwrap(), 754187983);

	let mut reader = Reader::with_settings(&data[..], Settings::new().with_endianness(Endianness::BigEndian));
	assert_eq!(reader.read_u16s(3).unwrap(), [0x2a01, 0xcffe, 0xf32c]);
	```
*/
/// Largest step, in bytes, by which a single read grows the scratch buffer.
const FILL_STEP: usize = 64 * 1024;

#[derive(Debug)]
pub struct Reader<R> {
	stream: R,
	settings: Settings,
	scratch: Vec<u8>,
}

impl<R> Reader<R> {
	/// Creates a reader with the default settings: little endian, ASCII, one-byte booleans.
	pub fn new(stream: R) -> Self {
		Self::with_settings(stream, Settings::new())
	}

	pub fn with_settings(stream: R, settings: Settings) -> Self {
		Self { stream, settings, scratch: Vec::new() }
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn settings_mut(&mut self) -> &mut Settings {
		&mut self.settings
	}

	pub fn get_ref(&self) -> &R {
		&self.stream
	}

	pub fn get_mut(&mut self) -> &mut R {
		&mut self.stream
	}

	pub fn into_inner(self) -> R {
		self.stream
	}
}

impl<R: Read> Reader<R> {
	/**
		Reads exactly `len` bytes into the scratch buffer.

		Past its current size, the buffer grows by at most [`FILL_STEP`] bytes per read, so a length taken from the data cannot allocate more than the stream actually holds.
	*/
	fn fill(&mut self, len: usize) -> Result<&[u8]> {
		let mut filled = 0;
		while filled < len {
			let end = if len <= self.scratch.len() { len } else { len.min(filled + FILL_STEP) };
			if self.scratch.len() < end {
				self.scratch.resize(end, 0);
			}
			self.stream.read_exact(&mut self.scratch[filled..end])?;
			filled = end;
		}
		Ok(&self.scratch[..len])
	}

	pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
		let mut buf = Vec::new();
		(&mut self.stream).take(len as u64).read_to_end(&mut buf)?;
		if buf.len() < len {
			return Err(Error::EndOfStream);
		}
		Ok(buf)
	}

	/// Fills `buf` from the stream.
	pub fn read_bytes_into(&mut self, buf: &mut [u8]) -> Result<()> {
		self.stream.read_exact(buf)?;
		Ok(())
	}

	pub fn read<T: Primitive>(&mut self) -> Result<T> {
		self.read_as(self.settings.endianness)
	}

	pub fn read_as<T: Primitive>(&mut self, endianness: Endianness) -> Result<T> {
		T::decode(self.fill(T::SIZE)?, endianness)
	}

	/// Reads `count` consecutive values in one batch.
	pub fn read_many<T: Primitive>(&mut self, count: usize) -> Result<Vec<T>> {
		self.read_many_as(count, self.settings.endianness)
	}

	pub fn read_many_as<T: Primitive>(&mut self, count: usize, endianness: Endianness) -> Result<Vec<T>> {
		if count == 0 {
			return Ok(Vec::new());
		}
		let len = run_len(count, T::SIZE)?;
		T::decode_vec(self.fill(len)?, endianness, count)
	}

	/// Fills `dst` with consecutive values read in one batch.
	pub fn read_into<T: Primitive>(&mut self, dst: &mut [T]) -> Result<()> {
		if dst.is_empty() {
			return Ok(());
		}
		let endianness = self.settings.endianness;
		let len = run_len(dst.len(), T::SIZE)?;
		primitive::read_many(self.fill(len)?, endianness, dst)
	}

	/// Reads a boolean of the reader's boolean width.
	pub fn read_bool(&mut self) -> Result<bool> {
		self.read_bool_sized(self.settings.boolean_size)
	}

	pub fn read_bool_sized(&mut self, size: BooleanSize) -> Result<bool> {
		self.read_bool_as(size, self.settings.endianness)
	}

	pub fn read_bool_as(&mut self, size: BooleanSize, endianness: Endianness) -> Result<bool> {
		primitive::read_bool(self.fill(size.size())?, size, endianness)
	}

	pub fn read_bools(&mut self, count: usize) -> Result<Vec<bool>> {
		self.read_bools_as(count, self.settings.boolean_size, self.settings.endianness)
	}

	pub fn read_bools_as(&mut self, count: usize, size: BooleanSize, endianness: Endianness) -> Result<Vec<bool>> {
		if count == 0 {
			return Ok(Vec::new());
		}
		let len = run_len(count, size.size())?;
		let bytes = self.fill(len)?;
		let mut out = vec![false; count];
		primitive::read_bools(bytes, size, endianness, &mut out)?;
		Ok(out)
	}

	/// Reads a signed 24-bit integer.
	pub fn read_i24(&mut self) -> Result<i32> {
		self.read_i24_as(self.settings.endianness)
	}

	pub fn read_i24_as(&mut self, endianness: Endianness) -> Result<i32> {
		primitive::read_i24(self.fill(INT24_SIZE)?, endianness)
	}

	/// Reads an unsigned 24-bit integer.
	pub fn read_u24(&mut self) -> Result<u32> {
		self.read_u24_as(self.settings.endianness)
	}

	pub fn read_u24_as(&mut self, endianness: Endianness) -> Result<u32> {
		primitive::read_u24(self.fill(INT24_SIZE)?, endianness)
	}

	/// Reads one character in the reader's encoding.
	pub fn read_char(&mut self) -> Result<char> {
		self.read_char_as(self.settings.encoding)
	}

	/// Reads one character, consuming as many code units as its encoding takes.
	pub fn read_char_as(&mut self, encoding: StringEncoding) -> Result<char> {
		let unit = encoding.unit_size();
		let mut buf = [0; 4];
		self.stream.read_exact(&mut buf[..unit])?;
		let units = encoding.char_units(&buf[..unit])?;
		self.stream.read_exact(&mut buf[unit..units * unit])?;
		encoding.decode_char(&buf[..units * unit])
	}

	/// Reads `count` characters.
	pub fn read_chars(&mut self, count: usize) -> Result<Vec<char>> {
		self.read_chars_as(count, self.settings.encoding)
	}

	pub fn read_chars_as(&mut self, count: usize, encoding: StringEncoding) -> Result<Vec<char>> {
		(0..count).map(|_| self.read_char_as(encoding)).collect()
	}

	/**
		Reads a string of exactly `units` code units.

		With `trim`, the string is cut at the first terminator code unit.
	*/
	pub fn read_string(&mut self, units: usize, trim: bool) -> Result<String> {
		self.read_string_as(units, self.settings.encoding, trim)
	}

	pub fn read_string_as(&mut self, units: usize, encoding: StringEncoding, trim: bool) -> Result<String> {
		if units == 0 {
			return Ok(String::new());
		}
		let len = run_len(units, encoding.unit_size())?;
		let bytes = self.fill(len)?;
		let bytes = if trim { trim_terminators(encoding, bytes) } else { bytes };
		encoding.decode(bytes)
	}

	/// Reads code units up to and including a terminator, which is not part of the result.
	pub fn read_string_null_terminated(&mut self) -> Result<String> {
		self.read_string_null_terminated_as(self.settings.encoding)
	}

	pub fn read_string_null_terminated_as(&mut self, encoding: StringEncoding) -> Result<String> {
		let unit_size = encoding.unit_size();
		let mut bytes = Vec::new();
		let mut unit = [0; 4];
		loop {
			let unit = &mut unit[..unit_size];
			self.stream.read_exact(unit)?;
			if StringEncoding::is_terminator(unit) {
				break;
			}
			bytes.extend_from_slice(unit);
		}
		encoding.decode(&bytes)
	}

	/// Reads `count` strings of `units` code units each.
	pub fn read_strings(&mut self, count: usize, units: usize, trim: bool) -> Result<Vec<String>> {
		let encoding = self.settings.encoding;
		(0..count).map(|_| self.read_string_as(units, encoding, trim)).collect()
	}

	pub fn read_strings_null_terminated(&mut self, count: usize) -> Result<Vec<String>> {
		let encoding = self.settings.encoding;
		(0..count).map(|_| self.read_string_null_terminated_as(encoding)).collect()
	}
}

impl<R: Read + Seek> Reader<R> {
	pub fn position(&mut self) -> Result<u64> {
		Ok(self.stream.stream_position()?)
	}

	/// Moves to an absolute position.
	pub fn seek(&mut self, offset: u64) -> Result<()> {
		log::trace!("seeking to {offset:#x}");
		self.stream.seek(SeekFrom::Start(offset))?;
		Ok(())
	}

	/// Reads a value at an absolute position, leaving the reader after it.
	pub fn read_at<T: Primitive>(&mut self, offset: u64) -> Result<T> {
		self.seek(offset)?;
		self.read()
	}

	pub fn read_many_at<T: Primitive>(&mut self, offset: u64, count: usize) -> Result<Vec<T>> {
		self.seek(offset)?;
		self.read_many(count)
	}

	pub fn read_string_null_terminated_at(&mut self, offset: u64) -> Result<String> {
		self.seek(offset)?;
		self.read_string_null_terminated()
	}

	/**
		Runs `f` and moves back to where the reader was before, also when `f` fails.

		## Examples

		```
		use std::io::Cursor;
		use binrec::Reader;

		let mut reader = Reader::new(Cursor::new(b"\x03abc"));
		let name = reader.peek_with(|r| {
			let len = r.read_u8()?;
			r.read_string(len.into(), false)
		}).unwrap();
		assert_eq!(name, "abc");
		assert_eq!(reader.position().unwrap(), 0);
		```
	*/
	pub fn peek_with<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		let start = self.position()?;
		let result = f(self);
		let restored = self.seek(start);
		let value = result?;
		restored?;
		Ok(value)
	}

	pub fn peek<T: Primitive>(&mut self) -> Result<T> {
		self.peek_with(Self::read::<T>)
	}

	pub fn peek_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
		self.peek_with(|r| r.read_bytes(len))
	}

	pub fn peek_object<T: Field>(&mut self) -> Result<T> {
		self.peek_with(Self::read_object::<T>)
	}

	/**
		Reads any [`Field`] type on its own: a primitive, a string, a fixed-size array, or an object.

		Strings read this way are null-terminated. Use [`Reader::read_objects`] for runs of unknown length.
	*/
	pub fn read_object<T: Field>(&mut self) -> Result<T> {
		let config = FieldConfig::root(std::any::type_name::<T>(), self.settings);
		T::read_field(self, &config)
	}

	pub fn read_object_at<T: Field>(&mut self, offset: u64) -> Result<T> {
		self.seek(offset)?;
		self.read_object()
	}

	/// Reads `count` consecutive values of any [`Field`] type.
	pub fn read_objects<T: Field>(&mut self, count: usize) -> Result<Vec<T>> {
		let config = FieldConfig::root(std::any::type_name::<T>(), self.settings);
		T::read_run(self, &config, count)
	}
}

macro_rules! named_reads {
	($($t:ty => $one:ident, $many:ident, $at:ident;)*) => {
		impl<R: Read> Reader<R> {$(
			#[inline]
			pub fn $one(&mut self) -> Result<$t> {
				self.read()
			}

			#[inline]
			pub fn $many(&mut self, count: usize) -> Result<Vec<$t>> {
				self.read_many(count)
			}
		)*}

		impl<R: Read + Seek> Reader<R> {$(
			#[inline]
			pub fn $at(&mut self, offset: u64) -> Result<$t> {
				self.read_at(offset)
			}
		)*}
	};
}

named_reads! {
	u8 => read_u8, read_u8s, read_u8_at;
	i8 => read_i8, read_i8s, read_i8_at;
	u16 => read_u16, read_u16s, read_u16_at;
	i16 => read_i16, read_i16s, read_i16_at;
	u32 => read_u32, read_u32s, read_u32_at;
	i32 => read_i32, read_i32s, read_i32_at;
	u64 => read_u64, read_u64s, read_u64_at;
	i64 => read_i64, read_i64s, read_i64_at;
	u128 => read_u128, read_u128s, read_u128_at;
	i128 => read_i128, read_i128s, read_i128_at;
	f16 => read_f16, read_f16s, read_f16_at;
	f32 => read_f32, read_f32s, read_f32_at;
	f64 => read_f64, read_f64s, read_f64_at;
	Decimal => read_decimal, read_decimals, read_decimal_at;
	NaiveDateTime => read_datetime, read_datetimes, read_datetime_at;
	NaiveDate => read_date, read_dates, read_date_at;
	NaiveTime => read_time, read_times, read_time_at;
	Vector2 => read_vector2, read_vector2s, read_vector2_at;
	Vector3 => read_vector3, read_vector3s, read_vector3_at;
	Vector4 => read_vector4, read_vector4s, read_vector4_at;
	Quaternion => read_quaternion, read_quaternions, read_quaternion_at;
	Matrix4x4 => read_matrix4x4, read_matrix4x4s, read_matrix4x4_at;
}
