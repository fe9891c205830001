/*!
	Endianness-aware reading and writing of fixed-layout binary records.

	The layout of a record is declared on a plain struct: fields are read and written in declaration order, and `#[binrec(...)]` attributes set string framing, array lengths (fixed or taken from an earlier "anchor" field), text encoding and boolean width per field.

	Layers, from the bottom:

	- [`primitive`]: byte-exact codecs for integers, floats, decimals, dates, vectors and booleans over byte slices, scalar and batched.
	- [`encoding`]: text encodings and string framing.
	- [`Reader`] and [`Writer`]: the codecs over a stream, with a reusable scratch buffer.
	- [`walker`]: reading and writing whole objects field by field, driven by [`BinaryObject`] implementations from `#[derive(BinaryObject)]`.

	## Examples

	```
	use std::io::Cursor;
	use binrec::{BinaryEnum, BinaryObject, Reader, Writer};

	#[derive(BinaryEnum, Clone, Copy, Debug, Default, PartialEq)]
	#[repr(u8)]
	enum Kind {
		#[default]
		Plain = 1,
		Fancy = 2,
	}

	#[derive(BinaryObject, Debug, Default, PartialEq)]
	struct Header {
		kind: Kind,
		#[binrec(bool_size = "u16")]
		visible: bool,
		#[binrec(len = 4, trim_nulls)]
		tag: String,
	}

	let data = b"\x02\x01\x00ab\0\0";
	let header: Header = Reader::new(Cursor::new(data)).read_object().unwrap();
	assert_eq!(header, Header { kind: Kind::Fancy, visible: true, tag: "ab".into() });

	let mut writer = Writer::new(Cursor::new(vec![]));
	writer.write_object(&header).unwrap();
	assert_eq!(writer.into_inner().into_inner(), data);
	```
*/

extern crate self as binrec;

mod attrs;
mod endian;
pub mod encoding;
mod error;
pub mod field;
pub mod primitive;
mod read;
mod settings;
pub mod types;
pub mod walker;
mod write;

#[cfg(test)]
mod proptest_tests;

pub use crate::attrs::{validate, ElementKind, FieldAttrs, FieldConfig, FieldDescriptor, FieldKind, Length, ScalarKind};
pub use crate::encoding::StringEncoding;
pub use crate::endian::Endianness;
pub use crate::error::{ConfigError, Error, Result};
pub use crate::field::Field;
pub use crate::primitive::Primitive;
pub use crate::read::Reader;
pub use crate::settings::{BooleanSize, Settings};
pub use crate::types::{Decimal, Matrix4x4, Quaternion, Vector2, Vector3, Vector4};
pub use crate::walker::{AnchorValue, BinaryObject, SelfDescribing};
pub use crate::write::Writer;

#[cfg(feature = "derive")]
pub use binrec_derive::{BinaryEnum, BinaryObject};
