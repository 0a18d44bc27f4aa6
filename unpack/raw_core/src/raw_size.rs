/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use crate::{Endianness, UnpackError};

/// A type with a fixed on-the-wire size that can be read from raw bytes.
pub trait RawSize: Sized {
    /// 编译期确定的静态大小
    const RAW_SIZE: usize;
    const ENDIAN: Endianness = Endianness::Native;

    fn raw_size(&self) -> usize {
        Self::RAW_SIZE
    }

    /// Reads `Self` from the front of `bytes`. Trailing bytes are ignored.
    fn from_bytes_with_endian(bytes: &[u8], endian: Endianness) -> Result<Self, UnpackError>;

    /// Reads `Self` using the byte order declared on the type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, UnpackError> {
        Self::from_bytes_with_endian(bytes, Self::ENDIAN)
    }
}

#[inline]
pub fn ensure_len(bytes: &[u8], needed: usize) -> Result<(), UnpackError> {
    if bytes.len() < needed {
        return Err(UnpackError::Insufficient {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

macro_rules! impl_raw_size_for_numeric {
    ($($ty:ty),*) => {
        $(
            impl RawSize for $ty {
                const RAW_SIZE: usize = std::mem::size_of::<$ty>();

                fn from_bytes_with_endian(bytes: &[u8], endian: Endianness) -> Result<Self, UnpackError> {
                    ensure_len(bytes, Self::RAW_SIZE)?;
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::RAW_SIZE]);
                    Ok(match endian {
                        Endianness::Little => Self::from_le_bytes(raw),
                        Endianness::Big => Self::from_be_bytes(raw),
                        Endianness::Native => Self::from_ne_bytes(raw),
                    })
                }
            }
        )*
    };
}

impl_raw_size_for_numeric!(u8, u16, u32, u64, i8, i16, i32, i64);

impl RawSize for bool {
    const RAW_SIZE: usize = 1;

    fn from_bytes_with_endian(bytes: &[u8], _endian: Endianness) -> Result<Self, UnpackError> {
        ensure_len(bytes, Self::RAW_SIZE)?;
        Ok(bytes[0] != 0)
    }
}

// 数组按元素依次解析，字节序传递给每个元素
impl<T, const N: usize> RawSize for [T; N]
where
    T: RawSize,
{
    const RAW_SIZE: usize = T::RAW_SIZE * N;

    fn from_bytes_with_endian(bytes: &[u8], endian: Endianness) -> Result<Self, UnpackError> {
        if N > 0 && T::RAW_SIZE == 0 {
            return Err(UnpackError::ZeroSizedElement);
        }
        ensure_len(bytes, Self::RAW_SIZE)?;

        let mut items = Vec::with_capacity(N);
        for i in 0..N {
            let start = i * T::RAW_SIZE;
            items.push(T::from_bytes_with_endian(
                &bytes[start..start + T::RAW_SIZE],
                endian,
            )?);
        }

        items.try_into().map_err(|_| UnpackError::Insufficient {
            needed: Self::RAW_SIZE,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_sizes() {
        assert_eq!(u8::RAW_SIZE, 1);
        assert_eq!(u16::RAW_SIZE, 2);
        assert_eq!(u32::RAW_SIZE, 4);
        assert_eq!(<[u8; 3]>::RAW_SIZE, 3);
        assert_eq!(<[u16; 4]>::RAW_SIZE, 8);
    }

    #[test]
    fn numeric_byte_order() {
        let data = [0x34, 0x12, 0xff];
        assert_eq!(
            u16::from_bytes_with_endian(&data, Endianness::Little).unwrap(),
            0x1234
        );
        assert_eq!(
            u16::from_bytes_with_endian(&data, Endianness::Big).unwrap(),
            0x3412
        );
    }

    #[test]
    fn array_elements_advance() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00];
        let arr = <[u16; 3]>::from_bytes_with_endian(&data, Endianness::Little).unwrap();
        assert_eq!(arr, [1, 2, 3]);
    }

    #[test]
    fn short_input_reports_sizes() {
        let err = u32::from_bytes_with_endian(&[1, 2], Endianness::Little).unwrap_err();
        assert_eq!(
            err,
            UnpackError::Insufficient {
                needed: 4,
                available: 2
            }
        );
    }
}
