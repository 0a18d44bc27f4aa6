/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
pub mod entry;
pub mod info;

pub use entry::{OemNotsSpecSelRec, OemTsSpecSelRec, SelEvent, SelEventRecord, StandardSpecSelRec};
pub use info::{SelInfo, SelOpSupport};
