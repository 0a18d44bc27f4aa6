/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
extern crate proc_macro;

mod annotation;

use annotation::{has_fixed_repr, parse_endian_anno, EndianAnno};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

#[proc_macro_derive(RAWDATA, attributes(raw_data))]
pub fn derive_deserialize(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !has_fixed_repr(&input.attrs) {
        return Err(syn::Error::new_spanned(
            name,
            "RAWDATA can only be derived for #[repr(C)] or #[repr(packed)] structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "RAWDATA cannot be derived for enums",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "RAWDATA cannot be derived for unions",
            ))
        }
    };

    let endian = match parse_endian_anno(&input.attrs)? {
        EndianAnno::Little => quote! { ::unpack::Endianness::Little },
        EndianAnno::Big => quote! { ::unpack::Endianness::Big },
        EndianAnno::Native => quote! { ::unpack::Endianness::Native },
    };

    let types: Vec<_> = fields.iter().map(|f| &f.ty).collect();
    let sum = quote! { 0 #(+ <#types as ::unpack::RawSize>::RAW_SIZE)* };

    // 每个字段依次读取，offset 累加
    let reads = fields.iter().map(|field| {
        let ty = &field.ty;
        quote! {
            {
                let value = <#ty as ::unpack::RawSize>::from_bytes_with_endian(
                    &bytes[offset..offset + <#ty as ::unpack::RawSize>::RAW_SIZE],
                    endian,
                )?;
                offset += <#ty as ::unpack::RawSize>::RAW_SIZE;
                value
            }
        }
    });

    let construct = match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|f| f.ident.as_ref());
            quote! { Self { #(#idents: #reads),* } }
        }
        Fields::Unnamed(_) => quote! { Self ( #(#reads),* ) },
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl ::unpack::RawSize for #name {
            const RAW_SIZE: usize = #sum;
            const ENDIAN: ::unpack::Endianness = #endian;

            #[allow(unused_mut, unused_variables, unused_assignments)]
            fn from_bytes_with_endian(
                bytes: &[u8],
                endian: ::unpack::Endianness,
            ) -> ::std::result::Result<Self, ::unpack::UnpackError> {
                if bytes.len() < Self::RAW_SIZE {
                    return Err(::unpack::UnpackError::Insufficient {
                        needed: Self::RAW_SIZE,
                        available: bytes.len(),
                    });
                }

                let mut offset = 0usize;
                Ok(#construct)
            }
        }
    })
}
