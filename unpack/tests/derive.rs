/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use unpack::{Endianness, RawSize, UnpackError, RAWDATA};

#[derive(Debug, PartialEq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
struct Inner {
    a: u16,
    b: u8,
}

#[derive(Debug, PartialEq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
struct Record {
    id: u8,
    values: [u16; 3],
    inner: Inner,
    flag: u8,
}

#[derive(Debug, PartialEq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "big")]
struct BigWord(u16, u8);

#[test]
fn size_ignores_padding() {
    assert_eq!(Inner::RAW_SIZE, 3);
    assert_eq!(Record::RAW_SIZE, 1 + 6 + 3 + 1);
    assert_eq!(BigWord::RAW_SIZE, 3);
}

#[test]
fn little_endian_record() {
    let data = [
        0x01, // id
        0x34, 0x12, 0x78, 0x56, 0xbc, 0x9a, // values
        0xef, 0xcd, 0x11, // inner
        0xff, // flag
    ];

    let rec = Record::from_bytes(&data).unwrap();
    assert_eq!(rec.id, 0x01);
    assert_eq!(rec.values, [0x1234, 0x5678, 0x9abc]);
    assert_eq!(rec.inner, Inner { a: 0xcdef, b: 0x11 });
    assert_eq!(rec.flag, 0xff);
}

#[test]
fn declared_endian_is_default() {
    assert_eq!(Record::ENDIAN, Endianness::Little);
    assert_eq!(BigWord::ENDIAN, Endianness::Big);
    assert_eq!(
        BigWord::from_bytes(&[0x12, 0x34, 0x56]).unwrap(),
        BigWord(0x1234, 0x56)
    );
}

#[test]
fn trailing_bytes_are_ignored() {
    let rec = Inner::from_bytes(&[0x01, 0x00, 0x02, 0xaa, 0xbb]).unwrap();
    assert_eq!(rec, Inner { a: 1, b: 2 });
}

#[test]
fn short_buffer_is_an_error() {
    let err = Record::from_bytes(&[0u8; 10]).unwrap_err();
    assert_eq!(
        err,
        UnpackError::Insufficient {
            needed: 11,
            available: 10
        }
    );
}
