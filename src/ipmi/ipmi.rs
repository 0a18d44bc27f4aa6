/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;

use unpack::RawSize;

use crate::error::{IpmiError, IpmiResult};
use crate::helper::buf2str;

pub const IPMI_BUF_SIZE: usize = 1024;
/// Largest request payload the OpenIPMI driver accepts (IPMI_MAX_MSG_LENGTH).
pub const IPMI_MAX_MSG_LENGTH: usize = 272;

// Network Function Codes
pub const IPMI_NETFN_CHASSIS: u8 = 0x0;
pub const IPMI_NETFN_APP: u8 = 0x6;
pub const IPMI_NETFN_STORAGE: u8 = 0xa;
pub const IPMI_NETFN_TRANSPORT: u8 = 0xc;

/*
 * CC
 * See IPMI specification table 5-2 Generic Completion Codes
 */
pub const IPMI_CC_OK: u8 = 0x00;

/// One IPMI request message. The payload is owned; the transport copies it
/// into the kernel call, so nothing here outlives the exchange.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IpmiMessage {
    pub netfn_lun: u8, // 6 bits+2 bits
    pub cmd: u8,
    data: Vec<u8>,
}

impl fmt::Debug for IpmiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpmiMessage")
            .field("netfn", &self.netfn())
            .field("lun", &self.lun())
            .field("cmd", &self.cmd)
            .field("data", &buf2str(&self.data))
            .finish()
    }
}

// 提供位域访问方法
impl IpmiMessage {
    pub fn new(netfn: u8, cmd: u8) -> Self {
        Self {
            netfn_lun: netfn << 2,
            cmd,
            data: Vec::new(),
        }
    }

    pub fn netfn(&self) -> u8 {
        self.netfn_lun >> 2
    }

    pub fn lun(&self) -> u8 {
        self.netfn_lun & 0b11
    }

    pub fn netfn_mut(&mut self, val: u8) {
        self.netfn_lun = (val << 2) | (self.netfn_lun & 0b11);
    }

    pub fn lun_mut(&mut self, val: u8) {
        self.netfn_lun = (self.netfn_lun & 0b11111100) | (val & 0b11);
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpmiRq {
    pub msg: IpmiMessage,
}

impl IpmiRq {
    pub fn new(netfn: u8, cmd: u8) -> Self {
        Self {
            msg: IpmiMessage::new(netfn, cmd),
        }
    }

    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.msg.set_data(data);
        self
    }
}

/// Raw response as read from the driver. `data[0]` is the completion code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpmiRs {
    pub recv_type: i32,
    pub netfn: u8,
    pub cmd: u8,
    pub data: Vec<u8>,
}

impl IpmiRs {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn ccode(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Response bytes after the completion code.
    pub fn payload(&self) -> &[u8] {
        self.data.get(1..).unwrap_or(&[])
    }

    /// Payload of a successful response. An empty response or a non-zero
    /// completion code is an error.
    pub fn check(&self) -> IpmiResult<&[u8]> {
        match self.ccode() {
            None => Err(IpmiError::ShortResponse { needed: 1, got: 0 }),
            Some(IPMI_CC_OK) => Ok(self.payload()),
            Some(cc) => Err(IpmiError::CompletionCode(cc)),
        }
    }

    /// Decodes a flat record from the payload of a successful response.
    pub fn decode<T: RawSize>(&self) -> IpmiResult<T> {
        let payload = self.check()?;
        Ok(T::from_bytes(payload)?)
    }
}
