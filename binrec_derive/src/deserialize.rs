use proc_macro2::TokenStream;
use quote::quote;

use crate::attrs::FieldSpec;

/// `BinaryObject::read_fields`: start from `Default` and read every field that is not ignored, in order.
pub fn gen_read_fields(specs: &[FieldSpec]) -> TokenStream {
	let mut reads = vec![];
	for (index, spec) in specs.iter().enumerate() {
		if spec.ignore {
			continue;
		}
		let ident = &spec.ident;
		let ty = &spec.ty;
		reads.push(quote! {
			if let ::std::option::Option::Some(value) = ::binrec::walker::read_field::<Self, #ty, __R>(reader, frame, #index, &obj)? {
				obj.#ident = value;
			}
		});
	}
	quote! {
		fn read_fields<__R: ::std::io::Read + ::std::io::Seek>(reader: &mut ::binrec::Reader<__R>, frame: &::binrec::walker::Frame) -> ::binrec::Result<Self> {
			#[allow(unused_mut)]
			let mut obj = <Self as ::std::default::Default>::default();
			#(#reads)*
			::std::result::Result::Ok(obj)
		}
	}
}
