/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
//! Typed commands. Each module adds its operations to
//! [`Ipmi`](crate::ipmi::intf::Ipmi) next to the records it decodes.

pub mod chassis;
pub mod lan;
pub mod mc;
pub mod raw;
pub mod sel;
pub mod sysinfo;
