/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
//! Userspace driver for talking to the local BMC through the Linux OpenIPMI
//! character device.
//!
//! ```no_run
//! use bmcipmi::interface::open::OpenIntf;
//! use bmcipmi::ipmi::intf::Ipmi;
//!
//! let ipmi = Ipmi::new(OpenIntf::new(0));
//! let devid = ipmi.get_device_id()?;
//! println!("{}", devid);
//! # Ok::<(), bmcipmi::error::IpmiError>(())
//! ```

pub mod commands;
pub mod error;
pub mod helper;
pub mod interface;
pub mod ipmi;
pub mod logging;

// 调试输出分级，对应 -v 的个数，由 logging::setup_logger 打开对应 target
#[macro_export]
macro_rules! debug1 {
    ($($arg:tt)*) => {
        log::debug!(target: "debug1", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug2 {
    ($($arg:tt)*) => {
        log::debug!(target: "debug2", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug3 {
    ($($arg:tt)*) => {
        log::debug!(target: "debug3", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug4 {
    ($($arg:tt)*) => {
        log::debug!(target: "debug4", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug5 {
    ($($arg:tt)*) => {
        log::trace!(target: "debug5", $($arg)*)
    };
}
