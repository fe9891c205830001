//! Error handling types.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Potential errors to encounter when reading or writing binary records.
///
/// Every error is final for the call that produced it. The stream position is
/// left wherever the failing operation stopped; callers that need to recover
/// should remember the position beforehand and seek back themselves.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The error originated from the [`io::Read`], [`io::Write`] or
	/// [`io::Seek`] implementation.
	#[error(transparent)]
	Io(io::Error),
	/// The stream ended before the requested number of bytes was available.
	#[error("unexpected end of stream")]
	EndOfStream,
	/// A caller-supplied buffer is smaller than the requested element run.
	#[error("buffer holds {actual} bytes but {required} are required")]
	Size { required: usize, actual: usize },
	/// The bytes do not decode to a valid value.
	#[error("invalid data: {0}")]
	Format(String),
	/// A value cannot be represented in its wire format.
	#[error("value out of range: {0}")]
	OutOfRange(String),
	/// The field metadata of a type is inconsistent.
	#[error("invalid configuration for `{ty}.{field}`: {reason}")]
	Config { ty: &'static str, field: &'static str, reason: ConfigError },
	/// A variable length names an anchor that is not a field of the type.
	#[error("`{ty}.{field}` takes its length from `{anchor}`, which is not a field of `{ty}`")]
	MissingMember { ty: &'static str, field: &'static str, anchor: &'static str },
	/// The declared type of a field has no binary mapping.
	#[error("`{ty}.{field}` has unsupported element type `{element}`")]
	Unsupported { ty: &'static str, field: &'static str, element: &'static str },
	/// Tried to write a field that holds no value.
	#[error("field `{field}` is empty and cannot be written")]
	NullValue { field: &'static str },
	/// An array does not hold the number of elements its length metadata demands.
	#[error("field `{field}` must hold {expected} elements but holds {actual}")]
	LengthMismatch { field: &'static str, expected: usize, actual: usize },
	/// Another reason provided by a self-describing implementation.
	#[error("{0}")]
	Custom(String),
}

/// Mistakes in the field metadata of a type, detected before any I/O for it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
	#[error("both a fixed and a variable length are specified")]
	ConflictingLength,
	#[error("null termination cannot be combined with a length or with trimming")]
	ConflictingStringFraming,
	#[error("fixed string length must be greater than zero")]
	ZeroLength,
	#[error("no length is specified and the field is not null-terminated")]
	Unsized,
	#[error("length attributes do not apply to this field")]
	LengthNotApplicable,
	#[error("per-element string lengths only apply to string arrays")]
	StringLengthNotApplicable,
	#[error("the 24-bit marker only applies to 32-bit integer fields")]
	Int24NotApplicable,
	#[error("fixed-size array of {intrinsic} elements declares length {declared}")]
	ArrayLengthConflict { intrinsic: usize, declared: usize },
	#[error("anchor `{0}` must be declared before the field it sizes")]
	AnchorNotBefore(&'static str),
	#[error("anchor `{0}` is ignored and has no value")]
	IgnoredAnchor(&'static str),
	#[error("{0} is not a valid boolean width")]
	InvalidBooleanSize(u32),
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		match err.kind() {
			io::ErrorKind::UnexpectedEof => Self::EndOfStream,
			_ => Self::Io(err),
		}
	}
}

impl Error {
	/// Creates a [`Error::Custom`] from any message.
	pub fn custom(msg: impl std::fmt::Display) -> Self {
		Self::Custom(msg.to_string())
	}

	pub(crate) fn config(ty: &'static str, field: &'static str, reason: ConfigError) -> Self {
		Self::Config { ty, field, reason }
	}

	/// Whether the error is caused by the stream running out of data.
	pub fn is_end_of_stream(&self) -> bool {
		matches!(self, Self::EndOfStream)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn eof_maps_to_end_of_stream() {
		let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "short").into();
		assert!(err.is_end_of_stream());
	}

	#[test]
	fn other_io_errors_stay_io() {
		let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
		assert!(matches!(err, Error::Io(_)));
	}

	#[test]
	fn config_message_names_the_field() {
		let err = Error::config("Header", "name", ConfigError::Unsized);
		assert_eq!(err.to_string(), "invalid configuration for `Header.name`: no length is specified and the field is not null-terminated");
	}
}
