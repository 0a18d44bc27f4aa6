/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
    Native,
}

/// 反序列化失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackError {
    /// 输入字节数不足以填充目标类型
    Insufficient { needed: usize, available: usize },
    /// 数组元素大小为0，无法切分
    ZeroSizedElement,
}

impl fmt::Display for UnpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnpackError::Insufficient { needed, available } => write!(
                f,
                "insufficient data: need {} bytes, got {}",
                needed, available
            ),
            UnpackError::ZeroSizedElement => write!(f, "cannot unpack zero-sized elements"),
        }
    }
}

impl std::error::Error for UnpackError {}

pub mod raw_size;
