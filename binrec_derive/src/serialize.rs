use proc_macro2::TokenStream;
use quote::quote;

use crate::attrs::FieldSpec;

/// `BinaryObject::write_fields`: write every field that is not ignored, in order.
pub fn gen_write_fields(specs: &[FieldSpec]) -> TokenStream {
	let mut writes = vec![];
	for (index, spec) in specs.iter().enumerate() {
		if spec.ignore {
			continue;
		}
		let ident = &spec.ident;
		let ty = &spec.ty;
		writes.push(quote! {
			::binrec::walker::write_field::<Self, #ty, __W>(writer, frame, #index, self, &self.#ident)?;
		});
	}
	quote! {
		fn write_fields<__W: ::std::io::Write + ::std::io::Seek>(&self, writer: &mut ::binrec::Writer<__W>, frame: &::binrec::walker::Frame) -> ::binrec::Result<()> {
			#(#writes)*
			::std::result::Result::Ok(())
		}
	}
}
