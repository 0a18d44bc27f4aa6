/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::collections::HashMap;
use std::fmt;

use nix::errno::Errno;

// 定义值-字符串映射类型
type ValStrMap = HashMap<u8, &'static str>;

pub fn val2str(val: u8, map: &ValStrMap) -> &'static str {
    map.get(&val).copied().unwrap_or("Unknown value")
}

lazy_static::lazy_static! {
    pub static ref COMPLETION_CODE_VALS: ValStrMap = {
        let mut m = HashMap::new();
        m.insert(0x00, "Command completed normally");
        m.insert(0xc0, "Node busy");
        m.insert(0xc1, "Invalid command");
        m.insert(0xc2, "Invalid command on LUN");
        m.insert(0xc3, "Timeout");
        m.insert(0xc4, "Out of space");
        m.insert(0xc5, "Reservation cancelled or invalid");
        m.insert(0xc6, "Request data truncated");
        m.insert(0xc7, "Request data length invalid");
        m.insert(0xc8, "Request data field length limit exceeded");
        m.insert(0xc9, "Parameter out of range");
        m.insert(0xca, "Cannot return number of requested data bytes");
        m.insert(0xcb, "Requested sensor, data, or record not found");
        m.insert(0xcc, "Invalid data field in request");
        m.insert(0xcd, "Command illegal for specified sensor or record type");
        m.insert(0xce, "Command response could not be provided");
        m.insert(0xcf, "Cannot execute duplicated request");
        m.insert(0xd0, "SDR Repository in update mode");
        m.insert(0xd1, "Device firmeware in update mode");
        m.insert(0xd2, "BMC initialization in progress");
        m.insert(0xd3, "Destination unavailable");
        m.insert(0xd4, "Insufficient privilege level");
        m.insert(0xd5, "Command not supported in present state");
        m.insert(0xd6, "Cannot execute command, command disabled");
        m.insert(0xff, "Unspecified error");
        m
    };
}

/// Errors returned by the driver. Nothing in the library exits the process;
/// every failure comes back as one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum IpmiError {
    /// ioctl/select on the device failed
    Transport { op: &'static str, errno: Errno },
    /// Response carried fewer bytes than the record being decoded
    ShortResponse { needed: usize, got: usize },
    /// Caller input rejected before touching the device
    InvalidInput(String),
    /// Byte image that cannot be interpreted
    InvalidData(String),
    /// Non-zero completion code from the controller
    CompletionCode(u8),
    /// Device open and other OS level failures
    System(String),
}

impl IpmiError {
    /// The OS error behind a transport failure, if any.
    pub fn errno(&self) -> Option<Errno> {
        match self {
            IpmiError::Transport { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}

impl fmt::Display for IpmiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpmiError::Transport { op, errno } => write!(f, "Unable to {}: {}", op, errno),
            IpmiError::ShortResponse { needed, got } => write!(
                f,
                "Response too short: need {} data bytes, got {}",
                needed, got
            ),
            IpmiError::InvalidInput(msg) => write!(f, "{}", msg),
            IpmiError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            IpmiError::CompletionCode(code) => write!(
                f,
                "Completion code error: 0x{:02x} ({})",
                code,
                val2str(*code, &COMPLETION_CODE_VALS)
            ),
            //对齐原生
            IpmiError::System(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for IpmiError {}

impl From<std::io::Error> for IpmiError {
    fn from(error: std::io::Error) -> Self {
        IpmiError::System(error.to_string())
    }
}

impl From<nix::Error> for IpmiError {
    fn from(error: nix::Error) -> Self {
        IpmiError::System(error.to_string())
    }
}

impl From<unpack::UnpackError> for IpmiError {
    fn from(error: unpack::UnpackError) -> Self {
        match error {
            unpack::UnpackError::Insufficient { needed, available } => {
                IpmiError::ShortResponse {
                    needed,
                    got: available,
                }
            }
            other => IpmiError::InvalidData(other.to_string()),
        }
    }
}

pub type IpmiResult<T> = Result<T, IpmiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_code_names() {
        assert_eq!(
            IpmiError::CompletionCode(0xc1).to_string(),
            "Completion code error: 0xc1 (Invalid command)"
        );
        assert_eq!(
            IpmiError::CompletionCode(0x42).to_string(),
            "Completion code error: 0x42 (Unknown value)"
        );
    }

    #[test]
    fn transport_error_keeps_errno() {
        let err = IpmiError::Transport {
            op: "send command",
            errno: Errno::EIO,
        };
        assert_eq!(err.errno(), Some(Errno::EIO));
        assert!(err.to_string().starts_with("Unable to send command"));
        assert_eq!(IpmiError::InvalidInput("x".into()).errno(), None);
    }

    #[test]
    fn unpack_shortfall_maps_to_short_response() {
        let err: IpmiError = unpack::UnpackError::Insufficient {
            needed: 15,
            available: 11,
        }
        .into();
        assert_eq!(
            err,
            IpmiError::ShortResponse {
                needed: 15,
                got: 11
            }
        );
    }
}
