/*!
	Reading and writing objects field by field.

	`#[derive(BinaryObject)]` generates a [`BinaryObject`] implementation that calls [`read_field`] and [`write_field`] once per field, in declaration order. The functions here do everything that does not depend on the concrete field type: validation, settings overrides, anchor lookup, explicit offsets and logging.

	Types that lay themselves out implement [`SelfDescribing`] instead and are never walked.
*/

use std::io::{Read, Seek, Write};

use crate::attrs::{validate, FieldDescriptor};
use crate::field::Field;
use crate::{Error, Reader, Result, Settings, Writer};

/**
	A struct whose fields are read and written in declaration order.

	Implement this with `#[derive(BinaryObject)]`, which also implements [`Field`] so the type can be nested in other objects and read with [`Reader::read_object`].

	## Examples

	```
	use std::io::Cursor;
	use binrec::{BinaryObject, Reader, Writer};

	#[derive(BinaryObject, Debug, Default, PartialEq)]
	struct Entry {
		count: u8,
		#[binrec(len_from = "count")]
		values: Vec<u16>,
		name: String,
	}

	let data = b"\x02\x01\x00\x02\x00abc\0";
	let entry: Entry = Reader::new(Cursor::new(data)).read_object().unwrap();
	assert_eq!(entry, Entry { count: 2, values: vec![1, 2], name: "abc".into() });

	let mut writer = Writer::new(Cursor::new(vec![]));
	writer.write_object(&entry).unwrap();
	assert_eq!(writer.into_inner().into_inner(), data);
	```
*/
pub trait BinaryObject: Default {
	const NAME: &'static str;
	/// One entry per field, in declaration order, including ignored fields.
	const FIELDS: &'static [FieldDescriptor];

	/// The current value of the field named `anchor` as a length, or `None` if no field of that name serves as an anchor.
	fn anchor_len(&self, anchor: &str) -> Option<Result<usize>>;

	fn read_fields<R: Read + Seek>(reader: &mut Reader<R>, frame: &Frame) -> Result<Self>;

	fn write_fields<W: Write + Seek>(&self, writer: &mut Writer<W>, frame: &Frame) -> Result<()>;
}

/**
	A type that reads and writes itself, bypassing field enumeration.

	`settings` are the effective settings for the value: the reader's or writer's, with the overrides of the field holding the value applied.

	## Examples

	```
	use std::io::{Read, Seek, Write};
	use binrec::{Reader, Result, SelfDescribing, Settings, Writer};

	/// A length-prefixed string.
	#[derive(Debug, Default, PartialEq)]
	struct Pascal(String);

	impl SelfDescribing for Pascal {
		fn read_from<R: Read + Seek>(reader: &mut Reader<R>, settings: &Settings) -> Result<Self> {
			let len = reader.read_as::<u8>(settings.endianness)?;
			reader.read_string_as(len.into(), settings.encoding, false).map(Pascal)
		}

		fn write_to<W: Write + Seek>(&self, writer: &mut Writer<W>, settings: &Settings) -> Result<()> {
			let len = u8::try_from(self.0.len()).map_err(binrec::Error::custom)?;
			writer.write_as(len, settings.endianness)?;
			writer.write_str_as(&self.0, settings.encoding)
		}
	}

	let value: Pascal = Reader::new(std::io::Cursor::new(b"\x02hi")).read_object().unwrap();
	assert_eq!(value, Pascal("hi".into()));
	```
*/
pub trait SelfDescribing: Sized {
	fn read_from<R: Read + Seek>(reader: &mut Reader<R>, settings: &Settings) -> Result<Self>;

	fn write_to<W: Write + Seek>(&self, writer: &mut Writer<W>, settings: &Settings) -> Result<()>;
}

/// Integer types that can serve as the anchor of a variable length.
pub trait AnchorValue {
	/// The value as a length.
	///
	/// # Errors
	///
	/// Returns [`Error::Format`] for negative values and values that do not fit in `usize`.
	fn as_len(&self) -> Result<usize>;
}

macro_rules! impl_anchor_value {
	($($t:ty),*) => {$(
		impl AnchorValue for $t {
			fn as_len(&self) -> Result<usize> {
				usize::try_from(*self).map_err(|_| Error::Format(format!("{} is not a valid length", self)))
			}
		}
	)*};
}

impl_anchor_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// State of one object being read or written.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
	settings: Settings,
	/// Stream position where the object starts; only recorded when a field has an explicit offset.
	base: u64,
}

impl Frame {
	/// The settings fields of this object start from.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}
}

fn has_offsets(fields: &[FieldDescriptor]) -> bool {
	fields.iter().any(|f| f.attrs.offset.is_some() && !f.attrs.ignore)
}

/**
	Reads a `T` field by field, starting from `settings`.

	All field metadata of `T` is validated before anything is read.
*/
pub fn read_object<T: BinaryObject, R: Read + Seek>(reader: &mut Reader<R>, settings: &Settings) -> Result<T> {
	validate(T::NAME, T::FIELDS)?;
	let base = if has_offsets(T::FIELDS) { reader.position()? } else { 0 };
	log::debug!("reading {} with {:?}", T::NAME, settings);
	T::read_fields(reader, &Frame { settings: *settings, base })
}

/**
	Writes `value` field by field, starting from `settings`.

	All field metadata of `T` is validated before anything is written.
*/
pub fn write_object<T: BinaryObject, W: Write + Seek>(value: &T, writer: &mut Writer<W>, settings: &Settings) -> Result<()> {
	validate(T::NAME, T::FIELDS)?;
	let base = if has_offsets(T::FIELDS) { writer.position()? } else { 0 };
	log::debug!("writing {} with {:?}", T::NAME, settings);
	value.write_fields(writer, &Frame { settings: *settings, base })
}

/**
	Reads field `index` of `T`, or returns `None` if the field is ignored.

	`obj` holds the fields read so far, which is where anchors are looked up.
*/
pub fn read_field<T: BinaryObject, F: Field, R: Read + Seek>(reader: &mut Reader<R>, frame: &Frame, index: usize, obj: &T) -> Result<Option<F>> {
	let field = &T::FIELDS[index];
	if field.attrs.ignore {
		return Ok(None);
	}
	let config = field.resolve(T::NAME, &frame.settings, |anchor| obj.anchor_len(anchor))?;
	if let Some(offset) = field.attrs.offset {
		reader.seek(frame.base + offset)?;
	}
	log::trace!("reading {}.{}", T::NAME, field.name);
	F::read_field(reader, &config).map(Some)
}

/// Writes field `index` of `obj`, whose current value is `value`. Ignored fields are skipped.
pub fn write_field<T: BinaryObject, F: Field, W: Write + Seek>(writer: &mut Writer<W>, frame: &Frame, index: usize, obj: &T, value: &F) -> Result<()> {
	let field = &T::FIELDS[index];
	if field.attrs.ignore {
		return Ok(());
	}
	let config = field.resolve(T::NAME, &frame.settings, |anchor| obj.anchor_len(anchor))?;
	if let Some(offset) = field.attrs.offset {
		writer.seek(frame.base + offset)?;
	}
	log::trace!("writing {}.{}", T::NAME, field.name);
	value.write_field(writer, &config)
}
