/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;
use std::ops::RangeInclusive;

use unpack::{RawSize, RAWDATA};

use crate::debug2;
use crate::error::{IpmiError, IpmiResult};
use crate::helper::buf2str;
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::{IpmiRq, IPMI_NETFN_STORAGE};
use crate::ipmi::time::ipmi_timestamp_numeric;

pub const IPMI_CMD_ADD_SEL_ENTRY: u8 = 0x44;

pub const SEL_RECORD_SIZE: usize = 16;
const SEL_HEADER_SIZE: usize = 3;

pub const SEL_OEM_TS_DATA_LEN: usize = 6;
pub const SEL_OEM_NOTS_DATA_LEN: usize = 13;

pub const SEL_STANDARD_RECORD: u8 = 0x02;
pub const SEL_OEM_TS_RANGE: RangeInclusive<u8> = 0xC0..=0xDF;
pub const SEL_OEM_NOTS_RANGE: RangeInclusive<u8> = 0xE0..=0xFF;
pub const OEM_NTS_TYPE: u8 = 0xFB;

/// System event body (record type 0x02).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
pub struct StandardSpecSelRec {
    pub timestamp: u32,
    pub gen_id: u16,
    pub evm_rev: u8,
    pub sensor_type: u8,
    pub sensor_num: u8,
    pub event_flag: u8, // bit 7 direction, bits 0-6 event type
    pub event_data: [u8; 3],
}

impl StandardSpecSelRec {
    pub fn event_type(&self) -> u8 {
        self.event_flag & 0x7F
    }

    /// true for a deassertion event
    pub fn event_dir(&self) -> bool {
        self.event_flag & 0x80 != 0
    }

    fn write_body(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.timestamp.to_le_bytes());
        out[4..6].copy_from_slice(&self.gen_id.to_le_bytes());
        out[6] = self.evm_rev;
        out[7] = self.sensor_type;
        out[8] = self.sensor_num;
        out[9] = self.event_flag;
        out[10..13].copy_from_slice(&self.event_data);
    }
}

/// Timestamped OEM body (record types 0xC0-0xDF).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
pub struct OemTsSpecSelRec {
    pub timestamp: u32,
    pub manf_id: [u8; 3],
    pub oem_defined: [u8; SEL_OEM_TS_DATA_LEN],
}

impl OemTsSpecSelRec {
    fn write_body(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.timestamp.to_le_bytes());
        out[4..7].copy_from_slice(&self.manf_id);
        out[7..13].copy_from_slice(&self.oem_defined);
    }
}

/// Non-timestamped OEM body (record types 0xE0-0xFF).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
pub struct OemNotsSpecSelRec {
    pub oem_defined: [u8; SEL_OEM_NOTS_DATA_LEN],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelEvent {
    Standard(StandardSpecSelRec),
    OemTimestamped {
        record_type: u8,
        record: OemTsSpecSelRec,
    },
    OemNonTimestamped {
        record_type: u8,
        record: OemNotsSpecSelRec,
    },
}

impl SelEvent {
    pub fn record_type(&self) -> u8 {
        match self {
            SelEvent::Standard(_) => SEL_STANDARD_RECORD,
            SelEvent::OemTimestamped { record_type, .. } => *record_type,
            SelEvent::OemNonTimestamped { record_type, .. } => *record_type,
        }
    }
}

/// One SEL entry as carried by Add SEL Entry: 2-byte record ID, record
/// type, 13 bytes of type specific body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelEventRecord {
    pub record_id: u16,
    pub event: SelEvent,
}

impl SelEventRecord {
    pub fn new(record_id: u16, event: SelEvent) -> Self {
        Self { record_id, event }
    }

    pub fn record_type(&self) -> u8 {
        self.event.record_type()
    }

    /// Builds the 16-byte wire image.
    pub fn encode(&self) -> IpmiResult<[u8; SEL_RECORD_SIZE]> {
        let mut out = [0u8; SEL_RECORD_SIZE];
        out[0..2].copy_from_slice(&self.record_id.to_le_bytes());
        out[2] = self.record_type();

        let body = &mut out[SEL_HEADER_SIZE..];
        match &self.event {
            SelEvent::Standard(rec) => rec.write_body(body),
            SelEvent::OemTimestamped {
                record_type,
                record,
            } => {
                if !SEL_OEM_TS_RANGE.contains(record_type) {
                    return Err(IpmiError::InvalidInput(format!(
                        "Record type 0x{:02x} is not a timestamped OEM type (0xc0-0xdf)",
                        record_type
                    )));
                }
                record.write_body(body);
            }
            SelEvent::OemNonTimestamped {
                record_type,
                record,
            } => {
                if !SEL_OEM_NOTS_RANGE.contains(record_type) {
                    return Err(IpmiError::InvalidInput(format!(
                        "Record type 0x{:02x} is not a non-timestamped OEM type (0xe0-0xff)",
                        record_type
                    )));
                }
                body.copy_from_slice(&record.oem_defined);
            }
        }
        Ok(out)
    }

    /// Parses a 16-byte record image. Extra bytes are ignored.
    pub fn decode(data: &[u8]) -> IpmiResult<Self> {
        if data.len() < SEL_RECORD_SIZE {
            return Err(IpmiError::ShortResponse {
                needed: SEL_RECORD_SIZE,
                got: data.len(),
            });
        }

        let record_id = u16::from_le_bytes([data[0], data[1]]);
        let record_type = data[2];
        let body = &data[SEL_HEADER_SIZE..SEL_RECORD_SIZE];

        let event = match record_type {
            SEL_STANDARD_RECORD => SelEvent::Standard(StandardSpecSelRec::from_bytes(body)?),
            t if SEL_OEM_TS_RANGE.contains(&t) => SelEvent::OemTimestamped {
                record_type,
                record: OemTsSpecSelRec::from_bytes(body)?,
            },
            t if SEL_OEM_NOTS_RANGE.contains(&t) => SelEvent::OemNonTimestamped {
                record_type,
                record: OemNotsSpecSelRec::from_bytes(body)?,
            },
            t => {
                return Err(IpmiError::InvalidData(format!(
                    "unsupported SEL record type 0x{:02x}",
                    t
                )))
            }
        };

        Ok(Self { record_id, event })
    }
}

impl fmt::Display for SelEventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SEL Record ID          : {:04x}", self.record_id)?;
        writeln!(f, " Record Type           : {:02x}", self.record_type())?;
        match &self.event {
            SelEvent::Standard(rec) => {
                writeln!(
                    f,
                    " Timestamp             : {}",
                    ipmi_timestamp_numeric(rec.timestamp)
                )?;
                writeln!(f, " Generator ID          : {:04x}", rec.gen_id)?;
                writeln!(f, " EvM Revision          : {:02x}", rec.evm_rev)?;
                writeln!(f, " Sensor Type           : {:02x}", rec.sensor_type)?;
                writeln!(f, " Sensor Number         : {:02x}", rec.sensor_num)?;
                writeln!(f, " Event Type            : {:02x}", rec.event_type())?;
                writeln!(
                    f,
                    " Event Direction       : {}",
                    if rec.event_dir() {
                        "Deassertion Event"
                    } else {
                        "Assertion Event"
                    }
                )?;
                writeln!(
                    f,
                    " Event Data            : {:02x}{:02x}{:02x}",
                    rec.event_data[0], rec.event_data[1], rec.event_data[2]
                )
            }
            SelEvent::OemTimestamped { record, .. } => {
                writeln!(
                    f,
                    " Timestamp             : {}",
                    ipmi_timestamp_numeric(record.timestamp)
                )?;
                writeln!(
                    f,
                    " Manufacturer ID       : {:02x}{:02x}{:02x}",
                    record.manf_id[2], record.manf_id[1], record.manf_id[0]
                )?;
                writeln!(
                    f,
                    " OEM Defined           : {}",
                    buf2str(&record.oem_defined)
                )
            }
            SelEvent::OemNonTimestamped { record, .. } => {
                writeln!(
                    f,
                    " OEM Defined           : {}",
                    buf2str(&record.oem_defined)
                )
            }
        }
    }
}

impl<I: IpmiIntf> Ipmi<I> {
    /// Add SEL Entry.
    pub fn log_system_event(&self, event: &SelEventRecord) -> IpmiResult<()> {
        let data = event.encode()?;
        let req = IpmiRq::new(IPMI_NETFN_STORAGE, IPMI_CMD_ADD_SEL_ENTRY).with_data(data);
        let rsp = self.sendrecv(&req)?;
        let payload = rsp.check()?;
        if let [lo, hi, ..] = payload {
            debug2!(
                "Added SEL entry 0x{:04x}",
                u16::from_le_bytes([*lo, *hi])
            );
        }
        Ok(())
    }
}
