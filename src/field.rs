//! Per-type dispatch used by the object walker.
//!
//! Every type that can appear as a field of a [`BinaryObject`](crate::BinaryObject)
//! implements [`Field`]. Its [`FieldKind`] is what static validation sees; the
//! methods do the actual I/O according to the resolved [`FieldConfig`].

use std::io::{Read, Seek, Write};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use half::f16;

use crate::attrs::{FieldConfig, FieldKind, ScalarKind};
use crate::primitive::Primitive;
use crate::walker::SelfDescribing;
use crate::{Decimal, Error, Matrix4x4, Quaternion, Reader, Result, Vector2, Vector3, Vector4, Writer};

/**
	A type that can be read or written as a field of an object.

	Implemented for all [`Primitive`] types, `bool`, `char`, `String`, `Option<T>`, `Vec<T>`, `[T; N]`, every [`SelfDescribing`] type, and every type deriving `BinaryObject` or `BinaryEnum`.

	Types without an implementation cannot be used as fields; the derive rejects them at compile time.
*/
pub trait Field: Sized {
	/// The shape of this type, checked against the field metadata before any I/O.
	const KIND: FieldKind;

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self>;

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()>;

	/// Reads `count` consecutive elements. Overridden by primitives to read the whole run in one batch.
	fn read_run<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig, count: usize) -> Result<Vec<Self>> {
		// the count may come from untrusted data
		let mut out = Vec::with_capacity(count.min(1024));
		for _ in 0..count {
			out.push(Self::read_field(reader, config)?);
		}
		Ok(out)
	}

	fn write_run<W: Write + Seek>(values: &[Self], writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		values.iter().try_for_each(|value| value.write_field(writer, config))
	}
}

/// [`Field::read_field`] for a [`Primitive`] type.
pub fn read_primitive<T: Primitive, R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<T> {
	reader.read_as(config.settings.endianness)
}

/// [`Field::write_field`] for a [`Primitive`] type.
pub fn write_primitive<T: Primitive, W: Write + Seek>(value: T, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
	writer.write_as(value, config.settings.endianness)
}

/// [`Field::read_run`] for a [`Primitive`] type.
pub fn read_primitive_run<T: Primitive, R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig, count: usize) -> Result<Vec<T>> {
	reader.read_many_as(count, config.settings.endianness)
}

/// [`Field::write_run`] for a [`Primitive`] type.
pub fn write_primitive_run<T: Primitive, W: Write + Seek>(values: &[T], writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
	writer.write_many_as(values, config.settings.endianness)
}

macro_rules! impl_primitive_field {
	($kind:expr; $($t:ty),*) => {$(
		impl Field for $t {
			const KIND: FieldKind = $kind;

			fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
				read_primitive(reader, config)
			}

			fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
				write_primitive(*self, writer, config)
			}

			fn read_run<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig, count: usize) -> Result<Vec<Self>> {
				read_primitive_run(reader, config, count)
			}

			fn write_run<W: Write + Seek>(values: &[Self], writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
				write_primitive_run(values, writer, config)
			}
		}
	)*};
}

impl_primitive_field!(FieldKind::Scalar(ScalarKind::Other);
	u8, i8, u16, i16, u64, i64, u128, i128, f16, f32, f64,
	Decimal, NaiveDateTime, NaiveDate, NaiveTime,
	Vector2, Vector3, Vector4, Quaternion, Matrix4x4
);

macro_rules! impl_int32_field {
	($($t:ty => $read24:ident, $write24:ident);*) => {$(
		impl Field for $t {
			const KIND: FieldKind = FieldKind::Scalar(ScalarKind::Int32);

			fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
				if config.int24 {
					reader.$read24(config.settings.endianness)
				} else {
					read_primitive(reader, config)
				}
			}

			fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
				if config.int24 {
					writer.$write24(*self, config.settings.endianness)
				} else {
					write_primitive(*self, writer, config)
				}
			}

			fn read_run<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig, count: usize) -> Result<Vec<Self>> {
				if config.int24 {
					(0..count).map(|_| reader.$read24(config.settings.endianness)).collect()
				} else {
					read_primitive_run(reader, config, count)
				}
			}

			fn write_run<W: Write + Seek>(values: &[Self], writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
				if config.int24 {
					values.iter().try_for_each(|&value| writer.$write24(value, config.settings.endianness))
				} else {
					write_primitive_run(values, writer, config)
				}
			}
		}
	)*};
}

impl_int32_field!(i32 => read_i24_as, write_i24_as; u32 => read_u24_as, write_u24_as);

impl Field for bool {
	const KIND: FieldKind = FieldKind::Scalar(ScalarKind::Bool);

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		reader.read_bool_as(config.settings.boolean_size, config.settings.endianness)
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		writer.write_bool_as(*self, config.settings.boolean_size, config.settings.endianness)
	}

	fn read_run<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig, count: usize) -> Result<Vec<Self>> {
		reader.read_bools_as(count, config.settings.boolean_size, config.settings.endianness)
	}

	fn write_run<W: Write + Seek>(values: &[Self], writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		writer.write_bools_as(values, config.settings.boolean_size, config.settings.endianness)
	}
}

impl Field for char {
	const KIND: FieldKind = FieldKind::Char;

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		reader.read_char_as(config.settings.encoding)
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		writer.write_char_as(*self, config.settings.encoding)
	}
}

impl Field for String {
	const KIND: FieldKind = FieldKind::String;

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		let encoding = config.settings.encoding;
		if config.null_terminated {
			reader.read_string_null_terminated_as(encoding)
		} else {
			reader.read_string_as(config.require_length()?, encoding, config.trim_null_terminators)
		}
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		let encoding = config.settings.encoding;
		if config.null_terminated {
			writer.write_string_null_terminated_as(self, encoding)
		} else {
			writer.write_string_as(self, config.require_length()?, encoding)
		}
	}
}

/// An empty value cannot be written; reading always produces `Some`.
impl<T: Field> Field for Option<T> {
	const KIND: FieldKind = T::KIND;

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		T::read_field(reader, config).map(Some)
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		match self {
			Some(value) => value.write_field(writer, config),
			None => Err(Error::NullValue { field: config.name }),
		}
	}
}

/// A run of elements whose count comes from the field's length metadata.
impl<T: Field> Field for Vec<T> {
	const KIND: FieldKind = T::KIND.array_of(None);

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		let len = config.require_length()?;
		if len == 0 {
			return Ok(Vec::new());
		}
		T::read_run(reader, &config.element(), len)
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		let expected = config.require_length()?;
		if self.len() != expected {
			return Err(Error::LengthMismatch { field: config.name, expected, actual: self.len() });
		}
		if expected == 0 {
			return Ok(());
		}
		T::write_run(self, writer, &config.element())
	}
}

impl<T: Field, const N: usize> Field for [T; N] {
	const KIND: FieldKind = T::KIND.array_of(Some(N));

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		let values = T::read_run(reader, &config.element(), N)?;
		values
			.try_into()
			.map_err(|values: Vec<T>| Error::LengthMismatch { field: config.name, expected: N, actual: values.len() })
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		T::write_run(self, writer, &config.element())
	}
}

impl<T: SelfDescribing> Field for T {
	const KIND: FieldKind = FieldKind::Object;

	fn read_field<R: Read + Seek>(reader: &mut Reader<R>, config: &FieldConfig) -> Result<Self> {
		T::read_from(reader, &config.settings)
	}

	fn write_field<W: Write + Seek>(&self, writer: &mut Writer<W>, config: &FieldConfig) -> Result<()> {
		self.write_to(writer, &config.settings)
	}
}
