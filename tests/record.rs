use std::io::{Cursor, Read, Seek, Write};

use binrec::{
	BinaryEnum, BinaryObject, ConfigError, Decimal, Endianness, Error, Reader, Result, SelfDescribing, Settings, StringEncoding,
	Vector3, Writer,
};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(BinaryEnum, Clone, Copy, Debug, Default, PartialEq)]
#[repr(i16)]
enum ShortSizedEnum {
	#[default]
	Val1 = 0x20,
	Val2 = 0x800,
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct MyBasicObj {
	enum_value: ShortSizedEnum,
	short_value: i16,
	date_time_value: NaiveDateTime,
	#[binrec(ignore)]
	ignored: i64,
	uint_array: [u32; 16],
	#[binrec(bool_size = "u32")]
	bool32: bool,
	null_terminated_ascii: String,
	#[binrec(encoding = "utf16", len = 10, trim_nulls)]
	utf16_fixed: String,
}

fn basic_bytes() -> Vec<u8> {
	let mut data = vec![0x00, 0x08, 0xff, 0x01];
	data.extend_from_slice(b"\x00\x3d\xe3\xc0\x26\x02\xc0\x08");
	for i in 0..16u32 {
		data.extend_from_slice(&i.to_le_bytes());
	}
	data.extend_from_slice(&[0; 4]);
	data.extend_from_slice(b"EndianBinaryIO\0");
	data.extend_from_slice(b"K\0e\0r\0m\0a\0l\0i\0s\0\0\0\0\0");
	data
}

fn basic_obj() -> MyBasicObj {
	MyBasicObj {
		enum_value: ShortSizedEnum::Val2,
		short_value: 511,
		date_time_value: NaiveDate::from_ymd_opt(1998, 12, 30).unwrap().and_hms_opt(16, 15, 30).unwrap(),
		ignored: 0,
		uint_array: std::array::from_fn(|i| i as u32),
		bool32: false,
		null_terminated_ascii: "EndianBinaryIO".into(),
		utf16_fixed: "Kermalis".into(),
	}
}

fn read<T: binrec::Field>(data: &[u8]) -> Result<T> {
	Reader::new(Cursor::new(data)).read_object()
}

fn write<T: binrec::Field>(value: &T) -> Result<Vec<u8>> {
	let mut writer = Writer::new(Cursor::new(vec![]));
	writer.write_object(value)?;
	Ok(writer.into_inner().into_inner())
}

#[test]
fn basic_object_reads() {
	let data = basic_bytes();
	let mut reader = Reader::new(Cursor::new(&data));
	let obj: MyBasicObj = reader.read_object().unwrap();
	assert_eq!(obj, basic_obj());
	assert_eq!(reader.position().unwrap(), data.len() as u64);
}

#[test]
fn basic_object_writes_exact_bytes() {
	let mut obj = basic_obj();
	obj.ignored = 1234;
	assert_eq!(write(&obj).unwrap(), basic_bytes());
}

#[test]
fn big_endian_object() {
	let settings = Settings::new().with_endianness(Endianness::BigEndian);
	let mut writer = Writer::with_settings(Cursor::new(vec![]), settings);
	writer.write_object(&basic_obj()).unwrap();
	let data = writer.into_inner().into_inner();
	assert_eq!(&data[..4], [0x08, 0x00, 0x01, 0xff]);
	// code units of the UTF-16 field stay little endian
	assert_eq!(&data[data.len() - 20..data.len() - 16], b"K\0e\0");

	let obj: MyBasicObj = Reader::with_settings(Cursor::new(&data), settings).read_object().unwrap();
	assert_eq!(obj, basic_obj());
}

#[test]
fn invalid_discriminant() {
	assert!(matches!(read::<ShortSizedEnum>(b"\x21\x00"), Err(Error::Format(_))));
	assert_eq!(read::<ShortSizedEnum>(b"\x20\x00").unwrap(), ShortSizedEnum::Val1);
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Item {
	id: u16,
	#[binrec(int24)]
	delta: i32,
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Inventory {
	count: u8,
	#[binrec(len_from = "count")]
	items: Vec<Item>,
	name_len: u16,
	#[binrec(len_from = "name_len")]
	name: String,
	#[binrec(len = 2, string_len = 3)]
	tags: Vec<String>,
}

#[test]
fn anchored_lengths() {
	let data = b"\x02\x01\x00\xff\xff\xff\x02\x00\x01\x00\x00\x04\x00bagsabcdef";
	let inventory: Inventory = read(data).unwrap();
	assert_eq!(
		inventory,
		Inventory {
			count: 2,
			items: vec![Item { id: 1, delta: -1 }, Item { id: 2, delta: 1 }],
			name_len: 4,
			name: "bags".into(),
			tags: vec!["abc".into(), "def".into()],
		}
	);
	assert_eq!(write(&inventory).unwrap(), data);
}

#[test]
fn zero_length_anchor_touches_nothing() {
	let data = b"\x00\x00\x00abcdef";
	let mut reader = Reader::new(Cursor::new(data));
	let inventory: Inventory = reader.read_object().unwrap();
	assert!(inventory.items.is_empty());
	assert!(inventory.name.is_empty());
	assert_eq!(reader.position().unwrap(), data.len() as u64);
}

#[test]
fn mismatched_anchor_on_write() {
	let inventory = Inventory { count: 1, items: vec![], name_len: 0, name: String::new(), tags: vec![String::new(); 2] };
	let mut writer = Writer::new(Cursor::new(vec![]));
	let err = writer.write_object(&inventory).unwrap_err();
	assert!(matches!(err, Error::LengthMismatch { field: "items", expected: 1, actual: 0 }));
	assert_eq!(writer.into_inner().into_inner(), [1]);
}

#[test]
fn int24_out_of_range() {
	let item = Item { id: 0, delta: 0x80_0000 };
	assert!(matches!(write(&item), Err(Error::OutOfRange(_))));
}

#[derive(BinaryObject, Debug, Default)]
struct Conflicting {
	n: u8,
	#[binrec(len = 2, len_from = "n")]
	data: Vec<u8>,
}

#[derive(BinaryObject, Debug, Default)]
struct Missing {
	#[binrec(len_from = "size")]
	data: Vec<u8>,
}

#[derive(BinaryObject, Debug, Default)]
struct Unsized {
	#[binrec(null_terminated = false)]
	text: String,
}

#[derive(BinaryObject, Debug, Default)]
struct EmptyFixed {
	#[binrec(len = 0)]
	text: String,
}

#[derive(BinaryObject, Debug, Default)]
struct SkippedCount {
	#[binrec(ignore)]
	count: u8,
	#[binrec(len_from = "count")]
	data: Vec<u8>,
}

#[derive(BinaryObject, Debug, Default)]
struct NumberWithStringLen {
	#[binrec(string_len = 4)]
	id: u32,
}

#[test]
fn configuration_errors_before_io() {
	let mut reader = Reader::new(Cursor::new(b"\x02\x01\x02"));
	let err = reader.read_object::<Conflicting>().unwrap_err();
	assert!(matches!(err, Error::Config { ty: "Conflicting", field: "data", reason: ConfigError::ConflictingLength }));
	assert_eq!(reader.position().unwrap(), 0);

	let err = write(&Conflicting::default()).unwrap_err();
	assert!(matches!(err, Error::Config { reason: ConfigError::ConflictingLength, .. }));

	assert!(matches!(read::<Missing>(b"\x01"), Err(Error::MissingMember { anchor: "size", .. })));
	assert!(matches!(read::<Unsized>(b"abc"), Err(Error::Config { reason: ConfigError::Unsized, .. })));
	assert!(matches!(read::<EmptyFixed>(b"abc"), Err(Error::Config { reason: ConfigError::ZeroLength, .. })));

	let mut reader = Reader::new(Cursor::new(b"\x02\x01\x02"));
	let err = reader.read_object::<SkippedCount>().unwrap_err();
	assert!(matches!(err, Error::Config { field: "data", reason: ConfigError::IgnoredAnchor("count"), .. }));
	assert_eq!(reader.position().unwrap(), 0);
	assert!(matches!(write(&SkippedCount::default()), Err(Error::Config { reason: ConfigError::IgnoredAnchor("count"), .. })));

	let err = read::<NumberWithStringLen>(b"\x01\x00\x00\x00").unwrap_err();
	assert!(matches!(err, Error::Config { field: "id", reason: ConfigError::StringLengthNotApplicable, .. }));
}

#[derive(BinaryObject, Debug, Default)]
struct Optional {
	id: u8,
	name: Option<String>,
}

#[test]
fn empty_value_cannot_be_written() {
	let err = write(&Optional { id: 1, name: None }).unwrap_err();
	assert!(matches!(err, Error::NullValue { field: "name" }));
	let value: Optional = read(b"\x01ab\0").unwrap();
	assert_eq!(value.name.as_deref(), Some("ab"));
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Label {
	text: String,
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Labeled {
	#[binrec(encoding = "utf16")]
	label: Label,
	tail: String,
}

#[test]
fn overrides_reach_nested_objects_only() {
	let data = b"K\0e\0\0\0ab\0";
	let labeled: Labeled = read(data).unwrap();
	assert_eq!(labeled, Labeled { label: Label { text: "Ke".into() }, tail: "ab".into() });
	assert_eq!(write(&labeled).unwrap(), data);
}

#[test]
fn ambient_encoding() {
	let settings = Settings::new().with_encoding(StringEncoding::Utf8);
	let mut reader = Reader::with_settings(Cursor::new("héllo\0".as_bytes()), settings);
	let label: Label = reader.read_object().unwrap();
	assert_eq!(label.text, "héllo");
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Sparse {
	magic: u8,
	#[binrec(offset = 4)]
	value: u16,
	after: u8,
}

#[test]
fn explicit_offsets_are_relative_to_the_object() {
	let data = b"\xee\x01\xff\xff\xff\x02\x00\x03";
	let mut reader = Reader::new(Cursor::new(data));
	reader.seek(1).unwrap();
	let sparse: Sparse = reader.read_object().unwrap();
	assert_eq!(sparse, Sparse { magic: 1, value: 2, after: 3 });

	let mut writer = Writer::new(Cursor::new(vec![]));
	writer.write_u8(0xee).unwrap();
	writer.write_object(&sparse).unwrap();
	assert_eq!(writer.into_inner().into_inner(), b"\xee\x01\0\0\0\x02\x00\x03");
}

/// A tagged value that checks its own marker byte.
#[derive(Debug, Default, PartialEq)]
struct Tagged(u32);

impl SelfDescribing for Tagged {
	fn read_from<R: Read + Seek>(reader: &mut Reader<R>, settings: &Settings) -> Result<Self> {
		let tag = reader.read_u8()?;
		if tag != 0xaa {
			return Err(Error::custom(format!("bad tag {tag:#x}")));
		}
		reader.read_as(settings.endianness).map(Tagged)
	}

	fn write_to<W: Write + Seek>(&self, writer: &mut Writer<W>, settings: &Settings) -> Result<()> {
		writer.write_u8(0xaa)?;
		writer.write_as(self.0, settings.endianness)
	}
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Holder {
	tagged: Tagged,
	#[binrec(len = 2)]
	more: Vec<Tagged>,
}

#[test]
fn self_describing_fields() {
	let data = b"\xaa\x01\0\0\0\xaa\x02\0\0\0\xaa\x03\0\0\0";
	let holder: Holder = read(data).unwrap();
	assert_eq!(holder, Holder { tagged: Tagged(1), more: vec![Tagged(2), Tagged(3)] });
	assert_eq!(write(&holder).unwrap(), data);
	assert!(matches!(read::<Holder>(b"\xab"), Err(Error::Custom(_))));
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Numerics {
	price: Decimal,
	position: Vector3,
	#[binrec(len = 3, bool_size = "u16")]
	flags: Vec<bool>,
	initial: char,
}

#[test]
fn numeric_fields() {
	let numerics = Numerics {
		price: Decimal::new(-12345, 2).unwrap(),
		position: Vector3 { x: 1.0, y: 2.0, z: 3.0 },
		flags: vec![true, false, true],
		initial: 'K',
	};
	let data = write(&numerics).unwrap();
	assert_eq!(data.len(), 16 + 12 + 6 + 1);
	assert_eq!(&data[28..], b"\x01\0\0\0\x01\0K");
	assert_eq!(read::<Numerics>(&data).unwrap(), numerics);
}

#[test]
fn truncated_stream() {
	let data = basic_bytes();
	let err = read::<MyBasicObj>(&data[..data.len() - 1]).unwrap_err();
	assert!(err.is_end_of_stream());
}

#[test]
fn peek_object_restores_position() {
	let data = basic_bytes();
	let mut reader = Reader::new(Cursor::new(&data));
	let obj: MyBasicObj = reader.peek_object().unwrap();
	assert_eq!(obj.short_value, 511);
	assert_eq!(reader.position().unwrap(), 0);
	assert_eq!(reader.read_object_at::<i16>(2).unwrap(), 511);
}

#[test]
fn runs_of_objects() {
	let items = [Item { id: 1, delta: 2 }, Item { id: 3, delta: -4 }];
	let mut writer = Writer::new(Cursor::new(vec![]));
	writer.write_objects(&items).unwrap();
	let data = writer.into_inner().into_inner();
	assert_eq!(data.len(), 10);
	let back: Vec<Item> = Reader::new(Cursor::new(&data)).read_objects(2).unwrap();
	assert_eq!(back, items);
}
