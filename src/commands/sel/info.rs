/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;

use bitflags::bitflags;
use unpack::RAWDATA;

use crate::error::IpmiResult;
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::{IpmiRq, IPMI_NETFN_STORAGE};
use crate::ipmi::time::{ipmi_timestamp_numeric, IPMI_TIME_UNSPECIFIED};

pub const IPMI_CMD_GET_SEL_INFO: u8 = 0x40;

bitflags! {
    /// Operation support byte of Get SEL Info.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelOpSupport: u8 {
        const GET_ALLOC_INFO = 1 << 0;
        const RESERVE        = 1 << 1;
        const PARTIAL_ADD    = 1 << 2;
        const DELETE         = 1 << 3;
        const OVERFLOW       = 1 << 7;
    }
}

/// Get SEL Info response, without the completion code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
pub struct SelInfo {
    pub version: u8,
    pub entries: u16,
    pub free_space: u16,
    pub last_add_time: u32,
    pub last_del_time: u32,
    pub op_support: u8,
}

impl SelInfo {
    fn flags(&self) -> SelOpSupport {
        SelOpSupport::from_bits_retain(self.op_support)
    }

    pub fn overflow(&self) -> bool {
        self.flags().contains(SelOpSupport::OVERFLOW)
    }

    pub fn supported_ops(&self) -> SelOpSupport {
        self.flags() - SelOpSupport::OVERFLOW
    }

    /// Share of the SEL in use, truncated like ipmitool does. `None` when the
    /// controller reports 0xffff (or more) free bytes.
    pub fn percent_used(&self) -> Option<u32> {
        if self.free_space == 0xffff {
            return None;
        }
        if self.entries == 0 {
            return Some(0);
        }
        let e_bytes = self.entries as u32 * 16;
        let total = self.free_space as u32 + e_bytes;
        Some(100 * e_bytes / total)
    }
}

impl fmt::Display for SelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format_time = |time: u32| {
            if time == IPMI_TIME_UNSPECIFIED || time == 0 {
                "Not Available".to_string()
            } else {
                ipmi_timestamp_numeric(time)
            }
        };

        let ops = self.supported_ops();
        let mut cmds = Vec::new();
        for (flag, name) in [
            (SelOpSupport::DELETE, "'Delete'"),
            (SelOpSupport::PARTIAL_ADD, "'Partial Add'"),
            (SelOpSupport::RESERVE, "'Reserve'"),
            (SelOpSupport::GET_ALLOC_INFO, "'Get Alloc Info'"),
        ] {
            if ops.contains(flag) {
                cmds.push(name);
            }
        }

        writeln!(f, "SEL Information")?;
        writeln!(
            f,
            "Version          : {}.{} ({})",
            self.version & 0xf,
            (self.version >> 4) & 0xf,
            if self.version == 0x51 || self.version == 0x02 {
                "v1.5, v2 compliant"
            } else {
                "Unknown"
            }
        )?;
        writeln!(f, "Entries          : {}", self.entries)?;
        writeln!(
            f,
            "Free Space       : {} bytes{}",
            self.free_space,
            if self.free_space == 0xffff {
                " or more"
            } else {
                ""
            }
        )?;
        writeln!(
            f,
            "Percent Used     : {}",
            self.percent_used()
                .map_or_else(|| "unknown".to_string(), |p| format!("{}%", p))
        )?;
        writeln!(f, "Last Add Time    : {}", format_time(self.last_add_time))?;
        writeln!(f, "Last Del Time    : {}", format_time(self.last_del_time))?;
        writeln!(f, "Overflow         : {}", self.overflow())?;
        write!(
            f,
            "Supported Cmds   : {}",
            if cmds.is_empty() {
                "None".to_string()
            } else {
                cmds.join(" ")
            }
        )
    }
}

impl<I: IpmiIntf> Ipmi<I> {
    pub fn get_sel_info(&self) -> IpmiResult<SelInfo> {
        let rsp = self.sendrecv(&IpmiRq::new(IPMI_NETFN_STORAGE, IPMI_CMD_GET_SEL_INFO))?;
        rsp.decode::<SelInfo>()
    }
}
