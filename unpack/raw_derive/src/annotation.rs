/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use syn::{Attribute, LitStr};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndianAnno {
    Little,
    Big,
    Native,
}

//解析 #[raw_data(endian = "little")]
pub fn parse_endian_anno(attrs: &[Attribute]) -> syn::Result<EndianAnno> {
    let mut endian = EndianAnno::Native;

    for attr in attrs {
        if !attr.path().is_ident("raw_data") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("endian") {
                let value: LitStr = meta.value()?.parse()?;
                endian = match value.value().as_str() {
                    "little" => EndianAnno::Little,
                    "big" => EndianAnno::Big,
                    "native" => EndianAnno::Native,
                    other => {
                        return Err(syn::Error::new_spanned(
                            &value,
                            format!("unknown endian `{}`, expected little/big/native", other),
                        ))
                    }
                };
                return Ok(());
            }
            Err(meta.error("unsupported raw_data attribute"))
        })?;
    }
    Ok(endian)
}

// 只接受 #[repr(C)] 或 #[repr(packed)]，保证字段顺序与原始数据一致
pub fn has_fixed_repr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("repr") {
            return false;
        }
        let mut fixed = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("C") || meta.path.is_ident("packed") {
                fixed = true;
            }
            Ok(())
        });
        fixed
    })
}
