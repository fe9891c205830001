use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{Attribute, Error, Field, Lit, LitInt, LitStr, Meta, NestedMeta, Result, Type};

/// A named field and its parsed `#[binrec(...)]` attributes.
pub struct FieldSpec {
	pub ident: Ident,
	pub ty: Type,
	pub ignore: bool,
	bool_size: Option<TokenStream>,
	encoding: Option<TokenStream>,
	null_terminated: Option<bool>,
	trim_nulls: bool,
	len: Option<LitInt>,
	pub len_from: Option<LitStr>,
	string_len: Option<LitInt>,
	pub string_len_from: Option<LitStr>,
	int24: bool,
	offset: Option<LitInt>,
}

fn opt<T: quote::ToTokens>(value: &Option<T>) -> TokenStream {
	match value {
		Some(x) => quote! { ::std::option::Option::Some(#x) },
		None => quote! { ::std::option::Option::None },
	}
}

fn lit_str(meta: &Meta) -> Result<LitStr> {
	match meta {
		Meta::NameValue(nv) => match &nv.lit {
			Lit::Str(x) => Ok(x.clone()),
			lit => Err(Error::new_spanned(lit, "expected a string")),
		},
		_ => Err(Error::new_spanned(meta, "expected `name = \"...\"`")),
	}
}

fn lit_int(meta: &Meta) -> Result<LitInt> {
	match meta {
		Meta::NameValue(nv) => match &nv.lit {
			Lit::Int(x) => Ok(x.clone()),
			lit => Err(Error::new_spanned(lit, "expected an integer")),
		},
		_ => Err(Error::new_spanned(meta, "expected `name = N`")),
	}
}

fn flag(meta: &Meta) -> Result<bool> {
	match meta {
		Meta::Path(_) => Ok(true),
		Meta::NameValue(nv) => match &nv.lit {
			Lit::Bool(x) => Ok(x.value),
			lit => Err(Error::new_spanned(lit, "expected `true` or `false`")),
		},
		Meta::List(_) => Err(Error::new_spanned(meta, "unexpected argument list")),
	}
}

fn bool_size(meta: &Meta) -> Result<TokenStream> {
	let lit = lit_str(meta)?;
	Ok(match lit.value().as_str() {
		"u8" => quote! { ::binrec::BooleanSize::U8 },
		"u16" => quote! { ::binrec::BooleanSize::U16 },
		"u32" => quote! { ::binrec::BooleanSize::U32 },
		_ => return Err(Error::new_spanned(lit, "boolean size must be \"u8\", \"u16\" or \"u32\"")),
	})
}

fn encoding(meta: &Meta) -> Result<TokenStream> {
	let lit = lit_str(meta)?;
	Ok(match lit.value().as_str() {
		"ascii" => quote! { ::binrec::StringEncoding::Ascii },
		"utf8" => quote! { ::binrec::StringEncoding::Utf8 },
		"utf16" => quote! { ::binrec::StringEncoding::Utf16 },
		"utf16be" => quote! { ::binrec::StringEncoding::Utf16BE },
		"utf32" => quote! { ::binrec::StringEncoding::Utf32 },
		_ => return Err(Error::new_spanned(lit, "unknown encoding")),
	})
}

fn set<T>(slot: &mut Option<T>, value: T, meta: &Meta) -> Result<()> {
	if slot.is_some() {
		return Err(Error::new_spanned(meta, "duplicate attribute"));
	}
	*slot = Some(value);
	Ok(())
}

fn binrec_metas(attrs: &[Attribute]) -> Result<Vec<Meta>> {
	let mut metas = vec![];
	for attr in attrs {
		if !attr.path.is_ident("binrec") {
			continue;
		}
		let list = match attr.parse_meta()? {
			Meta::List(x) => x,
			meta => return Err(Error::new_spanned(meta, "expected `#[binrec(...)]`")),
		};
		for nested in list.nested {
			match nested {
				NestedMeta::Meta(x) => metas.push(x),
				NestedMeta::Lit(lit) => return Err(Error::new_spanned(lit, "unexpected literal")),
			}
		}
	}
	Ok(metas)
}

impl FieldSpec {
	pub fn parse(field: &Field) -> Result<Self> {
		let ident = field
			.ident
			.clone()
			.ok_or_else(|| Error::new_spanned(field, "only fields with names are supported"))?;
		let mut spec = Self {
			ident,
			ty: field.ty.clone(),
			ignore: false,
			bool_size: None,
			encoding: None,
			null_terminated: None,
			trim_nulls: false,
			len: None,
			len_from: None,
			string_len: None,
			string_len_from: None,
			int24: false,
			offset: None,
		};
		for meta in binrec_metas(&field.attrs)? {
			let key = meta
				.path()
				.get_ident()
				.map(Ident::to_string)
				.ok_or_else(|| Error::new_spanned(&meta, "unknown binrec attribute"))?;
			match key.as_str() {
				"ignore" => spec.ignore = flag(&meta)?,
				"bool_size" => set(&mut spec.bool_size, bool_size(&meta)?, &meta)?,
				"encoding" => set(&mut spec.encoding, encoding(&meta)?, &meta)?,
				"ascii" => {
					if flag(&meta)? {
						set(&mut spec.encoding, quote! { ::binrec::StringEncoding::Ascii }, &meta)?;
					}
				}
				"null_terminated" => set(&mut spec.null_terminated, flag(&meta)?, &meta)?,
				"trim_nulls" => spec.trim_nulls = flag(&meta)?,
				"len" => set(&mut spec.len, lit_int(&meta)?, &meta)?,
				"len_from" => set(&mut spec.len_from, lit_str(&meta)?, &meta)?,
				"string_len" => set(&mut spec.string_len, lit_int(&meta)?, &meta)?,
				"string_len_from" => set(&mut spec.string_len_from, lit_str(&meta)?, &meta)?,
				"int24" => spec.int24 = flag(&meta)?,
				"offset" => set(&mut spec.offset, lit_int(&meta)?, &meta)?,
				_ => return Err(Error::new_spanned(&meta, "unknown binrec attribute")),
			}
		}
		Ok(spec)
	}

	/// The `FieldDescriptor` literal of this field.
	pub fn descriptor(&self) -> TokenStream {
		let name = self.ident.to_string();
		let ty = &self.ty;
		let kind = if self.ignore {
			quote! { ::binrec::FieldKind::Ignored }
		} else {
			quote! { <#ty as ::binrec::Field>::KIND }
		};
		let ignore = self.ignore;
		let bool_size = opt(&self.bool_size);
		let encoding = opt(&self.encoding);
		let null_terminated = opt(&self.null_terminated);
		let trim_nulls = self.trim_nulls;
		let len = opt(&self.len);
		let len_from = opt(&self.len_from);
		let string_len = opt(&self.string_len);
		let string_len_from = opt(&self.string_len_from);
		let int24 = self.int24;
		let offset = opt(&self.offset);
		quote! {
			::binrec::FieldDescriptor {
				name: #name,
				kind: #kind,
				attrs: ::binrec::FieldAttrs {
					ignore: #ignore,
					boolean_size: #bool_size,
					encoding: #encoding,
					null_terminated: #null_terminated,
					trim_null_terminators: #trim_nulls,
					fixed_length: #len,
					variable_length: #len_from,
					string_fixed_length: #string_len,
					string_variable_length: #string_len_from,
					int24: #int24,
					offset: #offset,
				},
			}
		}
	}
}
