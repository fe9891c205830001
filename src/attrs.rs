//! Per-field metadata and its resolution against the ambient settings.
//!
//! `#[derive(BinaryObject)]` turns `#[binrec(...)]` attributes into a static
//! table of [`FieldDescriptor`]s. The table is validated as a whole before an
//! object is read or written, so metadata mistakes surface before any byte of
//! the object is touched.

use crate::{BooleanSize, ConfigError, Error, Result, Settings, StringEncoding};

/// Shape of a scalar field, as far as metadata validation cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
	Bool,
	/// `i32`/`u32`, which may be narrowed to 24 bits.
	Int32,
	Other,
}

/// Element type of an array field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
	Scalar(ScalarKind),
	Char,
	String,
	Object,
	/// An element type with no binary mapping, named for the error message.
	Unsupported(&'static str),
}

/// The closed set of field shapes the object walker dispatches over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
	/// Skipped by the walker; the type need not be readable.
	Ignored,
	Scalar(ScalarKind),
	Char,
	String,
	/// A nested object, walked recursively or self-describing.
	Object,
	/// `len` is the intrinsic length of fixed-size arrays.
	Array { element: ElementKind, len: Option<usize> },
}

impl FieldKind {
	/// The kind of an array whose elements are of this kind.
	pub const fn array_of(self, len: Option<usize>) -> Self {
		let element = match self {
			Self::Scalar(kind) => ElementKind::Scalar(kind),
			Self::Char => ElementKind::Char,
			Self::String => ElementKind::String,
			Self::Object => ElementKind::Object,
			Self::Array { .. } => ElementKind::Unsupported("nested array"),
			Self::Ignored => ElementKind::Unsupported("ignored type"),
		};
		Self::Array { element, len }
	}
}

/**
	Typed metadata of one field, as declared with `#[binrec(...)]`.

	`None` means "not specified": the ambient setting or the default framing applies.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldAttrs {
	pub ignore: bool,
	pub boolean_size: Option<BooleanSize>,
	pub encoding: Option<StringEncoding>,
	pub null_terminated: Option<bool>,
	pub trim_null_terminators: bool,
	/// Array element count, or string length in code units.
	pub fixed_length: Option<usize>,
	/// Anchor field holding the array element count or string length.
	pub variable_length: Option<&'static str>,
	/// Per-element string length inside a string array.
	pub string_fixed_length: Option<usize>,
	pub string_variable_length: Option<&'static str>,
	pub int24: bool,
	/// Position of the field relative to the start of its object.
	pub offset: Option<u64>,
}

impl FieldAttrs {
	pub const DEFAULT: Self = Self {
		ignore: false,
		boolean_size: None,
		encoding: None,
		null_terminated: None,
		trim_null_terminators: false,
		fixed_length: None,
		variable_length: None,
		string_fixed_length: None,
		string_variable_length: None,
		int24: false,
		offset: None,
	};

	/// The boolean width declared on the field, or `default`.
	pub fn boolean_size_or(&self, default: BooleanSize) -> BooleanSize {
		self.boolean_size.unwrap_or(default)
	}

	/// The encoding declared on the field, or `default`.
	pub fn encoding_or(&self, default: StringEncoding) -> StringEncoding {
		self.encoding.unwrap_or(default)
	}

	/// The ambient settings with this field's overrides applied.
	pub fn apply(&self, ambient: &Settings) -> Settings {
		Settings {
			endianness: ambient.endianness,
			encoding: self.encoding_or(ambient.encoding),
			boolean_size: self.boolean_size_or(ambient.boolean_size),
		}
	}

	fn has_length(&self) -> bool {
		self.fixed_length.is_some() || self.variable_length.is_some()
	}

	fn has_string_length(&self) -> bool {
		self.string_fixed_length.is_some() || self.string_variable_length.is_some()
	}
}

impl Default for FieldAttrs {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// How the length of a field or string element is determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
	Fixed(usize),
	/// Taken from the current value of the named anchor field.
	Variable(&'static str),
	NullTerminated,
	Unspecified,
}

fn length_of(fixed: Option<usize>, variable: Option<&'static str>, null_terminated: bool) -> std::result::Result<Length, ConfigError> {
	match (fixed, variable) {
		(Some(_), Some(_)) => Err(ConfigError::ConflictingLength),
		(Some(n), None) => Ok(Length::Fixed(n)),
		(None, Some(anchor)) => Ok(Length::Variable(anchor)),
		(None, None) if null_terminated => Ok(Length::NullTerminated),
		(None, None) => Ok(Length::Unspecified),
	}
}

/// Name, shape and metadata of one field of a [`BinaryObject`](crate::BinaryObject).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
	pub name: &'static str,
	pub kind: FieldKind,
	pub attrs: FieldAttrs,
}

impl FieldDescriptor {
	fn is_string(&self) -> bool {
		self.kind == FieldKind::String
	}

	fn is_string_array(&self) -> bool {
		matches!(self.kind, FieldKind::Array { element: ElementKind::String, .. })
	}

	/// Whether strings of this field are null-terminated. Strings without any length are null-terminated unless stated otherwise.
	fn string_null_terminated(&self) -> bool {
		let sized = if self.is_string() { self.attrs.has_length() } else { self.attrs.has_string_length() };
		self.attrs.null_terminated.unwrap_or(!sized)
	}

	/// Length of the field itself: array element count or string length.
	pub fn length(&self, ty: &'static str) -> Result<Length> {
		let a = &self.attrs;
		let null_terminated = self.is_string() && self.string_null_terminated();
		length_of(a.fixed_length, a.variable_length, null_terminated).map_err(|reason| Error::config(ty, self.name, reason))
	}

	/// Length of each string element of a string array.
	pub fn string_length(&self, ty: &'static str) -> Result<Length> {
		let a = &self.attrs;
		let null_terminated = self.is_string_array() && self.string_null_terminated();
		length_of(a.string_fixed_length, a.string_variable_length, null_terminated).map_err(|reason| Error::config(ty, self.name, reason))
	}

	/**
		Computes the effective configuration of this field.

		`anchor` looks up the current value of a sibling field by name, returning `None` if there is no such field.
	*/
	pub fn resolve(&self, ty: &'static str, ambient: &Settings, anchor: impl Fn(&'static str) -> Option<Result<usize>>) -> Result<FieldConfig> {
		let lookup = |length: Length| -> Result<Option<usize>> {
			match length {
				Length::Fixed(n) => Ok(Some(n)),
				Length::Variable(name) => match anchor(name) {
					Some(len) => len.map(Some),
					None => Err(Error::MissingMember { ty, field: self.name, anchor: name }),
				},
				Length::NullTerminated | Length::Unspecified => Ok(None),
			}
		};
		let null_terminated = self.string_null_terminated();
		Ok(FieldConfig {
			owner: ty,
			name: self.name,
			settings: self.attrs.apply(ambient),
			int24: self.attrs.int24,
			null_terminated: self.is_string() && null_terminated,
			trim_null_terminators: self.attrs.trim_null_terminators,
			length: lookup(self.length(ty)?)?,
			string_length: lookup(self.string_length(ty)?)?,
			string_null_terminated: self.is_string_array() && null_terminated,
		})
	}
}

/**
	Effective configuration of one field for one read or write.

	Built by the object walker from the field's metadata, the settings in effect for the enclosing object, and the current values of anchor fields. [`Field`](crate::Field) implementations read everything they need from here.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldConfig {
	/// Name of the type owning the field.
	pub owner: &'static str,
	pub name: &'static str,
	pub settings: Settings,
	pub int24: bool,
	pub null_terminated: bool,
	pub trim_null_terminators: bool,
	/// Array element count or string length.
	pub length: Option<usize>,
	/// Length of each string element of a string array.
	pub string_length: Option<usize>,
	pub string_null_terminated: bool,
}

impl FieldConfig {
	/// Configuration of a value read or written on its own, outside of any object.
	///
	/// Strings are null-terminated; arrays have no length.
	pub fn root(owner: &'static str, settings: Settings) -> Self {
		Self {
			owner,
			name: "(root)",
			settings,
			int24: false,
			null_terminated: true,
			trim_null_terminators: false,
			length: None,
			string_length: None,
			string_null_terminated: false,
		}
	}

	/// Configuration applying to each element of an array field.
	#[must_use]
	pub fn element(&self) -> Self {
		Self {
			null_terminated: self.string_null_terminated,
			length: self.string_length,
			string_length: None,
			string_null_terminated: false,
			..*self
		}
	}

	/// The resolved length, which unsized fields lack.
	pub fn require_length(&self) -> Result<usize> {
		self.length.ok_or_else(|| Error::config(self.owner, self.name, ConfigError::Unsized))
	}
}

fn check_string_framing(null_terminated: Option<bool>, trim: bool, fixed: Option<usize>, sized: bool) -> std::result::Result<(), ConfigError> {
	match null_terminated {
		Some(true) if sized || trim => return Err(ConfigError::ConflictingStringFraming),
		Some(false) if !sized => return Err(ConfigError::Unsized),
		None if !sized && trim => return Err(ConfigError::ConflictingStringFraming),
		_ => {}
	}
	if fixed == Some(0) {
		return Err(ConfigError::ZeroLength);
	}
	Ok(())
}

fn check_int24(int24: bool, kind: ScalarKind) -> std::result::Result<(), ConfigError> {
	if int24 && kind != ScalarKind::Int32 {
		return Err(ConfigError::Int24NotApplicable);
	}
	Ok(())
}

fn check_field(ty: &'static str, index: usize, fields: &[FieldDescriptor]) -> Result<()> {
	let field = &fields[index];
	let a = &field.attrs;
	if a.ignore || field.kind == FieldKind::Ignored {
		return Ok(());
	}
	if let FieldKind::Array { element: ElementKind::Unsupported(element), .. } = field.kind {
		return Err(Error::Unsupported { ty, field: field.name, element });
	}
	let config = |reason| Error::config(ty, field.name, reason);

	if a.fixed_length.is_some() && a.variable_length.is_some() {
		return Err(config(ConfigError::ConflictingLength));
	}
	if a.string_fixed_length.is_some() && a.string_variable_length.is_some() {
		return Err(config(ConfigError::ConflictingLength));
	}
	for anchor in [a.variable_length, a.string_variable_length].into_iter().flatten() {
		match fields.iter().position(|f| f.name == anchor) {
			None => return Err(Error::MissingMember { ty, field: field.name, anchor }),
			Some(i) if i >= index => return Err(config(ConfigError::AnchorNotBefore(anchor))),
			Some(i) if fields[i].attrs.ignore || fields[i].kind == FieldKind::Ignored => return Err(config(ConfigError::IgnoredAnchor(anchor))),
			Some(_) => {}
		}
	}

	let no_string_length = || if a.has_string_length() { Err(ConfigError::StringLengthNotApplicable) } else { Ok(()) };
	let result = match field.kind {
		FieldKind::Ignored => Ok(()),
		FieldKind::Scalar(kind) => {
			if a.has_length() {
				Err(ConfigError::LengthNotApplicable)
			} else {
				no_string_length().and_then(|()| check_int24(a.int24, kind))
			}
		}
		FieldKind::Char | FieldKind::Object => {
			if a.has_length() {
				Err(ConfigError::LengthNotApplicable)
			} else {
				no_string_length().and_then(|()| check_int24(a.int24, ScalarKind::Other))
			}
		}
		FieldKind::String => no_string_length()
			.and_then(|()| check_int24(a.int24, ScalarKind::Other))
			.and_then(|()| check_string_framing(a.null_terminated, a.trim_null_terminators, a.fixed_length, a.has_length())),
		FieldKind::Array { element, len } => match (len, a.fixed_length, a.variable_length) {
			(Some(_), _, Some(_)) => Err(ConfigError::ConflictingLength),
			(Some(intrinsic), Some(declared), None) if declared != intrinsic => Err(ConfigError::ArrayLengthConflict { intrinsic, declared }),
			(None, None, None) => Err(ConfigError::Unsized),
			_ => match element {
				ElementKind::String => check_string_framing(a.null_terminated, a.trim_null_terminators, a.string_fixed_length, a.has_string_length()),
				ElementKind::Scalar(kind) => no_string_length().and_then(|()| check_int24(a.int24, kind)),
				ElementKind::Char | ElementKind::Object | ElementKind::Unsupported(_) => no_string_length().and_then(|()| check_int24(a.int24, ScalarKind::Other)),
			},
		},
	};
	result.map_err(config)
}

/// Checks the metadata of all fields of `ty` for consistency.
///
/// # Errors
///
/// Returns [`Error::Config`] for inconsistent metadata, [`Error::MissingMember`] for anchors naming no field, and [`Error::Unsupported`] for arrays of arrays.
pub fn validate(ty: &'static str, fields: &[FieldDescriptor]) -> Result<()> {
	(0..fields.len()).try_for_each(|index| check_field(ty, index, fields))
}
