/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derives accessors for a kernel message struct that carries its payload as
/// a raw `data: *mut u8` pointer plus a `data_len` length.
///
/// Generated methods:
/// - `data()` views the payload as a slice, `None` if the pointer is null or
///   the length is zero.
/// - `attach(&mut [u8])` points the message at a caller-owned buffer.
/// - `detach()` clears both fields.
#[proc_macro_derive(DataAccess)]
pub fn derive_data_access(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let fields = if let Data::Struct(data) = &input.data {
        &data.fields
    } else {
        return syn::Error::new_spanned(name, "DataAccess only support struct")
            .to_compile_error()
            .into();
    };

    let has_field = |wanted: &str| {
        fields
            .iter()
            .any(|f| f.ident.as_ref().is_some_and(|i| i == wanted))
    };
    let (has_data, has_data_len) = (has_field("data"), has_field("data_len"));

    if !has_data || !has_data_len {
        let msg = format!(
            "struct must contains 'data' and 'data_len' filed (missing {})",
            match (has_data, has_data_len) {
                (false, false) => "data, data_len",
                (false, _) => "data",
                _ => "data_len",
            }
        );
        return syn::Error::new_spanned(name, msg).to_compile_error().into();
    }

    let expanded = quote! {
        impl #name {
            /// # Safety
            ///
            /// `data` must point to at least `data_len` initialized bytes that
            /// stay alive and unaliased for the returned lifetime.
            pub unsafe fn data(&self) -> Option<&[u8]> {
                if self.data.is_null() || self.data_len == 0 {
                    None
                } else {
                    Some(std::slice::from_raw_parts(self.data, self.data_len as usize))
                }
            }

            /// The buffer must outlive every use of the pointer stored here.
            pub fn attach(&mut self, buf: &mut [u8]) {
                if buf.is_empty() {
                    self.detach();
                } else {
                    self.data = buf.as_mut_ptr();
                    self.data_len = buf.len() as _;
                }
            }

            pub fn detach(&mut self) {
                self.data = std::ptr::null_mut();
                self.data_len = 0;
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derives `member_offsets()` and `print_offsets()` for checking a
/// `#[repr(C)]` struct against the kernel ABI it mirrors.
#[proc_macro_derive(MemberOffsets)]
pub fn derive_member_offsets(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(name, "MemberOffsets needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "MemberOffsets only support struct")
                .to_compile_error()
                .into()
        }
    };

    let field_info: Vec<_> = fields
        .iter()
        .filter_map(|f| {
            let ident = f.ident.as_ref()?;
            let ty = &f.ty;
            Some(quote! {
                (
                    stringify!(#ident),
                    std::mem::offset_of!(#name, #ident),
                    std::mem::size_of::<#ty>()
                )
            })
        })
        .collect();

    let expanded = quote! {
        impl #name {
            /// (field, offset, size) for every field, in declaration order.
            pub fn member_offsets() -> Vec<(&'static str, usize, usize)> {
                vec![
                    #(#field_info),*
                ]
            }

            pub fn offset_of_member(member: &str) -> Option<usize> {
                Self::member_offsets()
                    .into_iter()
                    .find(|(name, _, _)| *name == member)
                    .map(|(_, offset, _)| offset)
            }

            pub fn print_offsets() {
                log::debug!(
                    target: "debug5",
                    "Struct: {}, Size: {}",
                    stringify!(#name),
                    std::mem::size_of::<#name>()
                );
                for (name, offset, size) in Self::member_offsets() {
                    log::debug!(
                        target: "debug5",
                        "Offset: 0x{:04x} Size: {:2} Field: {:12}",
                        offset,
                        size,
                        name,
                    );
                }
            }
        }
    };

    TokenStream::from(expanded)
}
