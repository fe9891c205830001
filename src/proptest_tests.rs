//! Property-based tests for the primitive and string codecs.

use std::io::Cursor;

use chrono::NaiveDateTime;
use proptest::prelude::*;

use crate::primitive::{self, Primitive};
use crate::types::time::{from_ticks, MAX_TICKS};
use crate::{Decimal, Endianness, Reader, StringEncoding, Vector3, Writer};

fn arb_endianness() -> impl Strategy<Value = Endianness> {
	prop_oneof![Just(Endianness::LittleEndian), Just(Endianness::BigEndian)]
}

fn arb_encoding() -> impl Strategy<Value = StringEncoding> {
	prop_oneof![
		Just(StringEncoding::Utf8),
		Just(StringEncoding::Utf16),
		Just(StringEncoding::Utf16BE),
		Just(StringEncoding::Utf32),
	]
}

fn arb_decimal() -> impl Strategy<Value = Decimal> {
	(-(1i128 << 96) + 1..(1i128 << 96), 0..=Decimal::MAX_SCALE).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale).unwrap())
}

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
	(0..=MAX_TICKS).prop_map(|ticks| from_ticks(ticks).unwrap())
}

fn arb_vector3() -> impl Strategy<Value = Vector3> {
	(any::<f32>(), any::<f32>(), any::<f32>()).prop_map(|(x, y, z)| Vector3 { x, y, z })
}

fn encoded<T: Primitive>(value: T, endianness: Endianness) -> Vec<u8> {
	let mut buf = vec![0; T::SIZE];
	primitive::write(&mut buf, value, endianness).unwrap();
	buf
}

fn round_trips<T: Primitive + PartialEq + std::fmt::Debug>(value: T, endianness: Endianness) -> Result<(), TestCaseError> {
	let buf = encoded(value, endianness);
	prop_assert_eq!(primitive::read::<T>(&buf, endianness).unwrap(), value);
	Ok(())
}

/// Big endian bytes with every `lane`-byte chunk reversed.
fn reversed_lanes(mut bytes: Vec<u8>, lane: usize) -> Vec<u8> {
	for chunk in bytes.chunks_exact_mut(lane) {
		chunk.reverse();
	}
	bytes
}

fn batch_matches_scalar<T: Primitive + PartialEq + std::fmt::Debug>(values: &[T], endianness: Endianness) -> Result<(), TestCaseError> {
	let mut batch = vec![0; values.len() * T::SIZE];
	primitive::write_many(&mut batch, values, endianness).unwrap();
	let scalar: Vec<u8> = values.iter().flat_map(|&v| encoded(v, endianness)).collect();
	prop_assert_eq!(&batch, &scalar);
	Ok(())
}

#[test]
fn small_ints_round_trip_exhaustively() {
	for endianness in [Endianness::LittleEndian, Endianness::BigEndian] {
		for value in u8::MIN..=u8::MAX {
			assert_eq!(primitive::read::<u8>(&encoded(value, endianness), endianness).unwrap(), value);
		}
		for value in i16::MIN..=i16::MAX {
			assert_eq!(primitive::read::<i16>(&encoded(value, endianness), endianness).unwrap(), value);
		}
	}
}

proptest! {
	#[test]
	fn ints_round_trip(a in any::<u32>(), b in any::<i64>(), c in any::<u128>(), d in any::<i128>(), e in arb_endianness()) {
		round_trips(a, e)?;
		round_trips(b, e)?;
		round_trips(c, e)?;
		round_trips(d, e)?;
	}

	#[test]
	fn floats_keep_their_bits(f in any::<f64>(), g in any::<f32>(), e in arb_endianness()) {
		let buf = encoded(f, e);
		prop_assert_eq!(primitive::read::<f64>(&buf, e).unwrap().to_bits(), f.to_bits());
		let buf = encoded(g, e);
		prop_assert_eq!(primitive::read::<f32>(&buf, e).unwrap().to_bits(), g.to_bits());
	}

	#[test]
	fn decimals_round_trip(value in arb_decimal(), e in arb_endianness()) {
		round_trips(value, e)?;
	}

	#[test]
	fn datetimes_round_trip(value in arb_datetime(), e in arb_endianness()) {
		round_trips(value, e)?;
	}

	#[test]
	fn endianness_symmetry(a in any::<u64>(), b in any::<i128>(), d in arb_decimal()) {
		prop_assert_eq!(reversed_lanes(encoded(a, Endianness::BigEndian), 8), encoded(a, Endianness::LittleEndian));
		prop_assert_eq!(reversed_lanes(encoded(b, Endianness::BigEndian), 16), encoded(b, Endianness::LittleEndian));
		prop_assert_eq!(reversed_lanes(encoded(d, Endianness::BigEndian), 4), encoded(d, Endianness::LittleEndian));
	}

	#[test]
	fn vectors_swap_per_component(v in arb_vector3()) {
		prop_assert_eq!(reversed_lanes(encoded(v, Endianness::BigEndian), 4), encoded(v, Endianness::LittleEndian));
	}

	#[test]
	fn batches_match_scalars(
		ints in prop::collection::vec(any::<u32>(), 0..64),
		wide in prop::collection::vec(any::<i128>(), 0..16),
		vectors in prop::collection::vec(arb_vector3(), 0..16),
		decimals in prop::collection::vec(arb_decimal(), 0..16),
		e in arb_endianness(),
	) {
		batch_matches_scalar(&ints, e)?;
		batch_matches_scalar(&wide, e)?;
		batch_matches_scalar(&vectors, e)?;
		batch_matches_scalar(&decimals, e)?;
	}

	#[test]
	fn null_terminated_strings_round_trip(s in "[^\\x00]*", encoding in arb_encoding()) {
		let mut writer = Writer::new(Cursor::new(vec![]));
		writer.write_string_null_terminated_as(&s, encoding).unwrap();
		let bytes = writer.into_inner().into_inner();
		let unit = encoding.unit_size();
		prop_assert_eq!(&bytes[bytes.len() - unit..], &[0u8; 4][..unit]);

		let mut reader = Reader::new(Cursor::new(&bytes));
		prop_assert_eq!(reader.read_string_null_terminated_as(encoding).unwrap(), s);
		prop_assert_eq!(reader.position().unwrap(), bytes.len() as u64);
	}

	#[test]
	fn fixed_strings_have_exact_length(s in ".*", units in 1usize..32, encoding in arb_encoding()) {
		let mut writer = Writer::new(Cursor::new(vec![]));
		writer.write_string_as(&s, units, encoding).unwrap();
		let bytes = writer.into_inner().into_inner();
		prop_assert_eq!(bytes.len(), units * encoding.unit_size());

		let back = Reader::new(Cursor::new(&bytes)).read_string_as(units, encoding, true).unwrap();
		prop_assert!(s.starts_with(&back));
	}
}
