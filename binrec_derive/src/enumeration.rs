use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Error, Expr, Fields, Result};

use crate::get_enum_type;

pub fn derive(input: &DeriveInput) -> Result<TokenStream> {
	let data = match &input.data {
		Data::Enum(data) => data,
		_ => return Err(Error::new_spanned(&input.ident, "BinaryEnum can only be derived for enums")),
	};
	let ty = get_enum_type(input)?;
	let name = &input.ident;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	let zero: Expr = parse_quote! { 0 };
	let mut last_disc = &zero;
	let mut disc_offset = 0usize;
	let mut arms = vec![];
	for var in &data.variants {
		if !matches!(var.fields, Fields::Unit) {
			return Err(Error::new_spanned(var, "BinaryEnum variants cannot have fields"));
		}
		let ident = &var.ident;
		if let Some((_, x)) = &var.discriminant {
			last_disc = x;
			disc_offset = 0;
		}
		arms.push(quote! { disc if disc == (#last_disc + (#disc_offset as #ty)) => Self::#ident, });
		disc_offset += 1;
	}

	Ok(quote! {
		impl #impl_generics ::binrec::Primitive for #name #ty_generics #where_clause {
			const SIZE: usize = <#ty as ::binrec::Primitive>::SIZE;

			fn decode(src: &[u8], endianness: ::binrec::Endianness) -> ::binrec::Result<Self> {
				let disc = <#ty as ::binrec::Primitive>::decode(src, endianness)?;
				::std::result::Result::Ok(match disc {
					#(#arms)*
					_ => return ::std::result::Result::Err(::binrec::Error::Format(::std::format!("invalid discriminant value for {}: {}", stringify!(#name), disc))),
				})
			}

			fn encode(self, dst: &mut [u8], endianness: ::binrec::Endianness) -> ::binrec::Result<()> {
				<#ty as ::binrec::Primitive>::encode(self as #ty, dst, endianness)
			}
		}

		impl #impl_generics ::binrec::Field for #name #ty_generics #where_clause {
			const KIND: ::binrec::FieldKind = ::binrec::FieldKind::Scalar(::binrec::ScalarKind::Other);

			fn read_field<__R: ::std::io::Read + ::std::io::Seek>(reader: &mut ::binrec::Reader<__R>, config: &::binrec::FieldConfig) -> ::binrec::Result<Self> {
				::binrec::field::read_primitive(reader, config)
			}

			fn write_field<__W: ::std::io::Write + ::std::io::Seek>(&self, writer: &mut ::binrec::Writer<__W>, config: &::binrec::FieldConfig) -> ::binrec::Result<()> {
				::binrec::field::write_primitive(*self, writer, config)
			}

			fn read_run<__R: ::std::io::Read + ::std::io::Seek>(reader: &mut ::binrec::Reader<__R>, config: &::binrec::FieldConfig, count: usize) -> ::binrec::Result<::std::vec::Vec<Self>> {
				::binrec::field::read_primitive_run(reader, config, count)
			}

			fn write_run<__W: ::std::io::Write + ::std::io::Seek>(values: &[Self], writer: &mut ::binrec::Writer<__W>, config: &::binrec::FieldConfig) -> ::binrec::Result<()> {
				::binrec::field::write_primitive_run(values, writer, config)
			}
		}
	})
}
