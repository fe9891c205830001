//! Date and time values as tick and day counts.
//!
//! A tick is 100 nanoseconds. Dates count days since 0001-01-01, date-times
//! count ticks since 0001-01-01T00:00:00, and times of day count ticks since
//! midnight. The representable range ends at 9999-12-31T23:59:59.9999999.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::primitive::Primitive;
use crate::{Endianness, Error, Result};

pub const TICKS_PER_SECOND: i64 = 10_000_000;
pub const TICKS_PER_DAY: i64 = 86_400 * TICKS_PER_SECOND;
/// Day number of 9999-12-31.
pub const MAX_DAY_NUMBER: i32 = 3_652_058;
pub const MAX_TICKS: i64 = (MAX_DAY_NUMBER as i64 + 1) * TICKS_PER_DAY - 1;

const NANOS_PER_TICK: i64 = 100;

fn date_from_day_number(day: i32) -> Result<NaiveDate> {
	if !(0..=MAX_DAY_NUMBER).contains(&day) {
		return Err(Error::Format(format!("day number {day} is outside the calendar range")));
	}
	NaiveDate::from_num_days_from_ce_opt(day + 1)
		.ok_or_else(|| Error::Format(format!("day number {day} is outside the calendar range")))
}

fn day_number(date: NaiveDate) -> Result<i32> {
	let day = date.num_days_from_ce() - 1;
	if !(0..=MAX_DAY_NUMBER).contains(&day) {
		return Err(Error::OutOfRange(format!("{date} is outside 0001-01-01..=9999-12-31")));
	}
	Ok(day)
}

fn time_from_ticks(ticks: i64) -> Result<NaiveTime> {
	if !(0..TICKS_PER_DAY).contains(&ticks) {
		return Err(Error::Format(format!("{ticks} ticks is not a time of day")));
	}
	let secs = (ticks / TICKS_PER_SECOND) as u32;
	let nanos = ((ticks % TICKS_PER_SECOND) * NANOS_PER_TICK) as u32;
	NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
		.ok_or_else(|| Error::Format(format!("{ticks} ticks is not a time of day")))
}

fn time_ticks(time: NaiveTime) -> i64 {
	// leap seconds are folded into the last tick of their second
	let nanos = time.nanosecond().min(999_999_999);
	i64::from(time.num_seconds_from_midnight()) * TICKS_PER_SECOND + i64::from(nanos) / NANOS_PER_TICK
}

/// Ticks since 0001-01-01T00:00:00.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] for date-times before year 1 or after year 9999.
pub fn to_ticks(value: NaiveDateTime) -> Result<i64> {
	let day = i64::from(day_number(value.date())?);
	Ok(day * TICKS_PER_DAY + time_ticks(value.time()))
}

/// Date-time from ticks since 0001-01-01T00:00:00.
///
/// # Errors
///
/// Returns [`Error::Format`] if `ticks` is outside `0..=MAX_TICKS`.
pub fn from_ticks(ticks: i64) -> Result<NaiveDateTime> {
	if !(0..=MAX_TICKS).contains(&ticks) {
		return Err(Error::Format(format!("{ticks} ticks is outside the calendar range")));
	}
	let date = date_from_day_number((ticks / TICKS_PER_DAY) as i32)?;
	let time = time_from_ticks(ticks % TICKS_PER_DAY)?;
	Ok(NaiveDateTime::new(date, time))
}

impl Primitive for NaiveDateTime {
	const SIZE: usize = 8;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		from_ticks(i64::decode(src, endianness)?)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		to_ticks(self)?.encode(dst, endianness)
	}
}

impl Primitive for NaiveDate {
	const SIZE: usize = 4;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		date_from_day_number(i32::decode(src, endianness)?)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		day_number(self)?.encode(dst, endianness)
	}
}

impl Primitive for NaiveTime {
	const SIZE: usize = 8;

	fn decode(src: &[u8], endianness: Endianness) -> Result<Self> {
		time_from_ticks(i64::decode(src, endianness)?)
	}

	fn encode(self, dst: &mut [u8], endianness: Endianness) -> Result<()> {
		time_ticks(self).encode(dst, endianness)
	}
}
