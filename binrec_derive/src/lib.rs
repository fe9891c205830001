mod attrs;
mod deserialize;
mod enumeration;
mod serialize;

use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Error, Fields, LitStr, Meta, NestedMeta, Result};

use crate::attrs::FieldSpec;

/**
	Implements `BinaryObject` and `Field` for a struct with named fields.

	The struct must implement `Default`. Fields are configured with `#[binrec(...)]`.
*/
#[proc_macro_derive(BinaryObject, attributes(binrec))]
pub fn derive_binary_object(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	object(&input).unwrap_or_else(|e| e.to_compile_error()).into()
}

/// Implements `Primitive` and `Field` for a fieldless enum with a `#[repr]` integer type.
#[proc_macro_derive(BinaryEnum)]
pub fn derive_binary_enum(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	enumeration::derive(&input).unwrap_or_else(|e| e.to_compile_error()).into()
}

fn object(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
	let fields = match &input.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(fields) => &fields.named,
			_ => return Err(Error::new_spanned(&input.ident, "BinaryObject needs a struct with named fields")),
		},
		_ => return Err(Error::new_spanned(&input.ident, "BinaryObject can only be derived for structs")),
	};
	let specs = fields.iter().map(FieldSpec::parse).collect::<Result<Vec<_>>>()?;

	let name = &input.ident;
	let name_str = name.to_string();
	let mut generics = input.generics.clone();
	let where_clause = generics.make_where_clause();
	where_clause.predicates.push(parse_quote!(Self: ::std::default::Default));
	for spec in specs.iter().filter(|s| !s.ignore) {
		let ty = &spec.ty;
		where_clause.predicates.push(parse_quote!(#ty: ::binrec::Field));
	}
	let anchors = anchor_arms(&specs);
	for spec in anchor_fields(&specs) {
		let ty = &spec.ty;
		where_clause.predicates.push(parse_quote!(#ty: ::binrec::AnchorValue));
	}
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	let descriptors = specs.iter().map(FieldSpec::descriptor);
	let read_fields = deserialize::gen_read_fields(&specs);
	let write_fields = serialize::gen_write_fields(&specs);

	Ok(quote! {
		impl #impl_generics ::binrec::BinaryObject for #name #ty_generics #where_clause {
			const NAME: &'static str = #name_str;
			const FIELDS: &'static [::binrec::FieldDescriptor] = &[#(#descriptors),*];

			fn anchor_len(&self, anchor: &str) -> ::std::option::Option<::binrec::Result<usize>> {
				match anchor {
					#(#anchors)*
					_ => ::std::option::Option::None,
				}
			}

			#read_fields

			#write_fields
		}

		impl #impl_generics ::binrec::Field for #name #ty_generics #where_clause {
			const KIND: ::binrec::FieldKind = ::binrec::FieldKind::Object;

			fn read_field<__R: ::std::io::Read + ::std::io::Seek>(reader: &mut ::binrec::Reader<__R>, config: &::binrec::FieldConfig) -> ::binrec::Result<Self> {
				::binrec::walker::read_object(reader, &config.settings)
			}

			fn write_field<__W: ::std::io::Write + ::std::io::Seek>(&self, writer: &mut ::binrec::Writer<__W>, config: &::binrec::FieldConfig) -> ::binrec::Result<()> {
				::binrec::walker::write_object(self, writer, &config.settings)
			}
		}
	})
}

/// Fields named as the anchor of some other field. Ignored fields have no value to offer.
fn anchor_fields(specs: &[FieldSpec]) -> Vec<&FieldSpec> {
	let referenced: Vec<String> = specs
		.iter()
		.flat_map(|s| [&s.len_from, &s.string_len_from])
		.flatten()
		.map(LitStr::value)
		.collect();
	specs
		.iter()
		.filter(|s| !s.ignore && referenced.contains(&s.ident.to_string()))
		.collect()
}

fn anchor_arms(specs: &[FieldSpec]) -> Vec<proc_macro2::TokenStream> {
	anchor_fields(specs)
		.into_iter()
		.map(|spec| {
			let ident = &spec.ident;
			let name = ident.to_string();
			quote! { #name => ::std::option::Option::Some(::binrec::AnchorValue::as_len(&self.#ident)), }
		})
		.collect()
}

/// The integer type named by the `#[repr]` attribute of an enum.
fn get_enum_type(input: &DeriveInput) -> Result<Ident> {
	for attr in &input.attrs {
		if !attr.path.is_ident("repr") {
			continue;
		}
		let list = match attr.parse_meta()? {
			Meta::List(x) => x,
			_ => continue,
		};
		if list.nested.is_empty() {
			return Err(Error::new_spanned(attr, "encountered repr attribute with no arguments"));
		}
		for nested_meta in list.nested {
			let meta = match nested_meta {
				NestedMeta::Meta(x) => x,
				NestedMeta::Lit(_) => continue,
			};
			let path = match meta {
				Meta::Path(x) => x,
				_ => continue,
			};
			if path.is_ident("C") || path.is_ident("transparent") {
				continue;
			}
			return path.get_ident().cloned().ok_or_else(|| Error::new_spanned(&path, "invalid repr attribute argument"));
		}
	}
	Err(Error::new_spanned(&input.ident, "add a repr attribute to specify the discriminant type, e.g. #[repr(u16)]"))
}
