/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
//! Fixed-layout binary record decoding.
//!
//! `#[derive(RAWDATA)]` on a `#[repr(C)]` struct sums the field sizes into
//! `RawSize::RAW_SIZE` and reads the fields back to back, with no padding,
//! in the byte order given by `#[raw_data(endian = "little" | "big")]`.
pub use raw_core::raw_size::RawSize;
pub use raw_core::{Endianness, UnpackError};
pub use raw_derive::RAWDATA;
