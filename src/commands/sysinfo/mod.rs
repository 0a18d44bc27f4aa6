/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use crate::debug2;
use crate::error::{IpmiError, IpmiResult};
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::{IpmiRq, IPMI_NETFN_APP};

pub const IPMI_SET_SYS_INFO: u8 = 0x58;

pub const IPMI_SYSINFO_SYSTEM_FW_VERSION: u8 = 1;

pub const SYSTEM_INFO_BLK_SZ: usize = 16;
/// Longest string the chunker will send; the first block gives two bytes to
/// the encoding and length fields.
pub const SYSTEM_INFO_STR_MAX: usize = 62;

const SYSINFO_ENCODING_ASCII: u8 = 0;

pub const SET_SYSTEM_INFO_REQ_SIZE: usize = 2 + SYSTEM_INFO_BLK_SZ;

/// One Set System Info Parameters request: parameter selector, set selector
/// and a 16-byte block of string data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSystemInfoReq {
    pub param_selector: u8,
    pub set_selector: u8,
    pub str_data: [u8; SYSTEM_INFO_BLK_SZ],
}

impl SetSystemInfoReq {
    pub fn to_bytes(&self) -> [u8; SET_SYSTEM_INFO_REQ_SIZE] {
        let mut out = [0u8; SET_SYSTEM_INFO_REQ_SIZE];
        out[0] = self.param_selector;
        out[1] = self.set_selector;
        out[2..].copy_from_slice(&self.str_data);
        out
    }
}

/// Splits a string parameter into set-selector blocks.
///
/// The input is cut to 62 bytes. Block 0 carries the encoding (ASCII), the
/// length and the first 14 bytes; every later block carries the next 16.
/// Blocks are zero padded.
pub fn system_info_blocks(param: u8, value: &[u8]) -> Vec<SetSystemInfoReq> {
    let value = &value[..value.len().min(SYSTEM_INFO_STR_MAX)];

    let mut first = [0u8; SYSTEM_INFO_BLK_SZ];
    first[0] = SYSINFO_ENCODING_ASCII;
    first[1] = value.len() as u8;
    let head = value.len().min(SYSTEM_INFO_BLK_SZ - 2);
    first[2..2 + head].copy_from_slice(&value[..head]);

    let mut blocks = vec![first];
    for chunk in value[head..].chunks(SYSTEM_INFO_BLK_SZ) {
        let mut block = [0u8; SYSTEM_INFO_BLK_SZ];
        block[..chunk.len()].copy_from_slice(chunk);
        blocks.push(block);
    }

    blocks
        .into_iter()
        .enumerate()
        .map(|(i, str_data)| SetSystemInfoReq {
            param_selector: param,
            set_selector: i as u8,
            str_data,
        })
        .collect()
}

impl<I: IpmiIntf> Ipmi<I> {
    fn set_system_info(&self, block: &SetSystemInfoReq) -> IpmiResult<()> {
        let req = IpmiRq::new(IPMI_NETFN_APP, IPMI_SET_SYS_INFO).with_data(block.to_bytes());
        self.sendrecv(&req)?.check()?;
        Ok(())
    }

    /// Stores the system firmware version string on the BMC, one Set System
    /// Info request per block. Stops at the first failing block.
    pub fn set_system_fw_version(&self, version: &str) -> IpmiResult<()> {
        if version.is_empty() {
            return Err(IpmiError::InvalidInput("Version length is 0".to_string()));
        }
        if version.len() > SYSTEM_INFO_STR_MAX {
            debug2!(
                "Firmware version truncated to {} bytes",
                SYSTEM_INFO_STR_MAX
            );
        }

        for block in system_info_blocks(IPMI_SYSINFO_SYSTEM_FW_VERSION, version.as_bytes()) {
            self.set_system_info(&block)?;
        }
        Ok(())
    }
}
