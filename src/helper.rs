/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use crate::error::{IpmiError, IpmiResult};

pub fn ipmi24toh(data: &[u8; 3]) -> u32 {
    u32::from_le_bytes([data[0], data[1], data[2], 0])
}

pub fn buf2str(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Multi-line hex dump, 16 bytes per line, headed by `desc` and the length.
pub fn hexbuf(buf: &[u8], desc: &str) -> String {
    if buf.is_empty() {
        return String::new();
    }

    let mut output = format!("{} ({} bytes)", desc, buf.len());
    buf.chunks(16).for_each(|chunk| {
        output.push('\n');
        output.push_str(&buf2str(chunk));
    });
    output
}

/// Parses one byte given as `0x1f`, `1f` or `31`-style hex.
pub fn parse_hex_byte(s: &str) -> IpmiResult<u8> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(digits, 16)
        .map_err(|_| IpmiError::InvalidInput(format!("Invalid hex byte: {}", s)))
}

pub fn parse_hex_bytes<S: AsRef<str>>(items: &[S]) -> IpmiResult<Vec<u8>> {
    items.iter().map(|s| parse_hex_byte(s.as_ref())).collect()
}
