/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;

use bitflags::bitflags;
use unpack::RAWDATA;

use crate::error::{IpmiError, IpmiResult};
use crate::helper::ipmi24toh;
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::{IpmiRq, IPMI_NETFN_APP};
use crate::{debug1, debug2};

// IPMI constant definitions matching C reference
pub const BMC_GET_DEVICE_ID: u8 = 0x01;
pub const BMC_SET_WATCHDOG_TIMER: u8 = 0x24;
pub const BMC_GET_WATCHDOG_TIMER: u8 = 0x25;
pub const BMC_SET_GLOBAL_ENABLES: u8 = 0x2e;
pub const BMC_GET_GLOBAL_ENABLES: u8 = 0x2f;

pub const IPM_WATCHDOG_NO_ACTION: u8 = 0x00;
pub const IPM_WATCHDOG_SMS_OS: u8 = 0x04;
pub const IPM_WATCHDOG_CLEAR_SMS_OS: u8 = 0x10;
/// Timer use byte, bit 6: timer is running.
pub const IPM_WATCHDOG_RUNNING: u8 = 0x40;

/// Set Watchdog Timer payload that stops the timer: SMS/OS use, no action,
/// no pre-timeout, clear the SMS/OS expiration flag, countdown 0x0bb8.
pub const WATCHDOG_SHUTOFF: [u8; 6] = [
    IPM_WATCHDOG_SMS_OS,
    IPM_WATCHDOG_NO_ACTION,
    0x00,
    IPM_WATCHDOG_CLEAR_SMS_OS,
    0xb8,
    0x0b,
];

// Bit masks from C reference code
const IPM_DEV_DEVICE_ID_REV_MASK: u8 = 0x0F; // BCD-encoded
const IPM_DEV_DEVICE_ID_SDR_MASK: u8 = 0x80; // 1 = provides SDRs
const IPM_DEV_FWREV1_AVAIL_MASK: u8 = 0x80; // 0 = normal operation
const IPM_DEV_FWREV1_MAJOR_MASK: u8 = 0x7F; // Major firmware revision

bitflags! {
    /// Additional Device Support byte of Get Device ID.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AdtlDeviceSupport: u8 {
        const SENSOR          = 1 << 0;
        const SDR_REPOSITORY  = 1 << 1;
        const SEL             = 1 << 2;
        const FRU_INVENTORY   = 1 << 3;
        const IPMB_EVENT_RCVR = 1 << 4;
        const IPMB_EVENT_GEN  = 1 << 5;
        const BRIDGE          = 1 << 6;
        const CHASSIS         = 1 << 7;
    }
}

bitflags! {
    /// BMC Global Enables byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GlobalEnables: u8 {
        const RECV_MSG_QUEUE_INTR  = 1 << 0;
        const EVENT_MSG_BUFF_INTR  = 1 << 1;
        const EVENT_MSG_BUFF       = 1 << 2;
        const SYSTEM_EVENT_LOGGING = 1 << 3;
        const OEM0                 = 1 << 5;
        const OEM1                 = 1 << 6;
        const OEM2                 = 1 << 7;
    }
}

/// Get Device ID response, without the completion code.
#[derive(Debug, Default, Clone, PartialEq, Eq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
pub struct IpmDevidRsp {
    pub device_id: u8,
    pub device_revision: u8,
    pub fw_rev1: u8,
    pub fw_rev2: u8,
    pub ipmi_version: u8,
    pub adtl_device_support: u8,
    pub manufacturer_id: [u8; 3],
    pub product_id: [u8; 2],
    pub aux_fw_rev: [u8; 4],
}

impl IpmDevidRsp {
    pub fn manufacturer_id(&self) -> u32 {
        ipmi24toh(&self.manufacturer_id)
    }

    pub fn product_id(&self) -> u16 {
        u16::from_le_bytes(self.product_id)
    }

    pub fn additional_support(&self) -> AdtlDeviceSupport {
        AdtlDeviceSupport::from_bits_retain(self.adtl_device_support)
    }

    pub fn provides_sel(&self) -> bool {
        self.additional_support().contains(AdtlDeviceSupport::SEL)
    }

    pub fn device_available(&self) -> bool {
        self.fw_rev1 & IPM_DEV_FWREV1_AVAIL_MASK == 0
    }

    pub fn provides_sdrs(&self) -> bool {
        self.device_revision & IPM_DEV_DEVICE_ID_SDR_MASK != 0
    }
}

impl fmt::Display for IpmDevidRsp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manufacturer_id = self.manufacturer_id();
        let product_id = self.product_id();

        writeln!(f, "Device ID                 : {}", self.device_id)?;
        writeln!(
            f,
            "Device Revision           : {}",
            self.device_revision & IPM_DEV_DEVICE_ID_REV_MASK
        )?;
        // "%u.%02x" as in ipmitool
        writeln!(
            f,
            "Firmware Revision         : {}.{:02x}",
            self.fw_rev1 & IPM_DEV_FWREV1_MAJOR_MASK,
            self.fw_rev2
        )?;
        writeln!(
            f,
            "IPMI Version              : {}.{}",
            self.ipmi_version & 0x0f,
            (self.ipmi_version & 0xf0) >> 4
        )?;
        writeln!(f, "Manufacturer ID           : {}", manufacturer_id)?;
        writeln!(
            f,
            "Manufacturer Name         : {}",
            get_manufacturer_name(manufacturer_id)
        )?;
        writeln!(
            f,
            "Product ID                : {} (0x{:02x}{:02x})",
            product_id, self.product_id[1], self.product_id[0]
        )?;
        writeln!(
            f,
            "Product Name              : {}",
            get_product_name(manufacturer_id, product_id).unwrap_or("Unknown")
        )?;
        writeln!(
            f,
            "Device Available          : {}",
            if self.device_available() { "yes" } else { "no" }
        )?;
        writeln!(
            f,
            "Provides Device SDRs      : {}",
            if self.provides_sdrs() { "yes" } else { "no" }
        )?;
        writeln!(f, "Additional Device Support :")?;
        for (name, _) in self.additional_support().iter_names() {
            writeln!(f, "    {}", additional_support_description(name))?;
        }
        writeln!(f, "Aux Firmware Rev Info     : ")?;
        for aux_rev in &self.aux_fw_rev {
            writeln!(f, "    0x{:02x}", aux_rev)?;
        }
        Ok(())
    }
}

fn get_manufacturer_name(manufacturer_id: u32) -> &'static str {
    match manufacturer_id {
        2 => "IBM",
        7 => "Hitachi",
        11 => "Hewlett-Packard",
        15 => "Dell Inc",
        42 => "Sun Microsystems",
        343 => "Intel Corporation",
        674 => "DELL Inc",
        2011 => "Huawei Technologies Co., Ltd.",
        5703 => "SUPERMICRO",
        10876 => "Super Micro Computer Inc.",
        19046 => "Lenovo",
        20301 => "IBM",
        _ => "Unknown",
    }
}

// Product information table based on ipmitool's ipmi_oem_product_info
struct ProductInfo {
    manufacturer_id: u32,
    product_id: u16,
    name: &'static str,
}

const PRODUCT_INFO_TABLE: &[ProductInfo] = &[
    ProductInfo {
        manufacturer_id: 343,
        product_id: 0x000C,
        name: "TSRLT2",
    },
    ProductInfo {
        manufacturer_id: 343,
        product_id: 0x001B,
        name: "TIGPR2U",
    },
    ProductInfo {
        manufacturer_id: 343,
        product_id: 0x0028,
        name: "S5000PAL",
    },
    ProductInfo {
        manufacturer_id: 343,
        product_id: 0x0100,
        name: "Tiger4",
    },
    ProductInfo {
        manufacturer_id: 5703,
        product_id: 0x1000,
        name: "X9DRi-LN4+/X9DR3-LN4+",
    },
    ProductInfo {
        manufacturer_id: 5703,
        product_id: 0x1001,
        name: "X9SRi-F",
    },
];

fn get_product_name(manufacturer_id: u32, product_id: u16) -> Option<&'static str> {
    PRODUCT_INFO_TABLE
        .iter()
        .find(|p| p.manufacturer_id == manufacturer_id && p.product_id == product_id)
        .map(|p| p.name)
}

fn additional_support_description(flag: &str) -> &'static str {
    match flag {
        "SENSOR" => "Sensor Device",
        "SDR_REPOSITORY" => "SDR Repository Device",
        "SEL" => "SEL Device",
        "FRU_INVENTORY" => "FRU Inventory Device",
        "IPMB_EVENT_RCVR" => "IPMB Event Receiver",
        "IPMB_EVENT_GEN" => "IPMB Event Generator",
        "BRIDGE" => "Bridge",
        "CHASSIS" => "Chassis Device",
        _ => "Reserved",
    }
}

impl<I: IpmiIntf> Ipmi<I> {
    /// Get Device ID.
    pub fn get_device_id(&self) -> IpmiResult<IpmDevidRsp> {
        let rsp = self.sendrecv(&IpmiRq::new(IPMI_NETFN_APP, BMC_GET_DEVICE_ID))?;
        rsp.decode::<IpmDevidRsp>()
    }

    /// Reports bit 6 of the timer use byte. A response of two bytes or less
    /// counts as "not running" rather than an error, whatever its completion
    /// code.
    pub fn watchdog_running(&self) -> IpmiResult<bool> {
        let rsp = self.sendrecv(&IpmiRq::new(IPMI_NETFN_APP, BMC_GET_WATCHDOG_TIMER))?;
        if rsp.data.len() <= 2 {
            debug1!(
                "Get Watchdog Timer: short response ({} bytes)",
                rsp.data.len()
            );
            return Ok(false);
        }
        Ok(rsp.data[1] & IPM_WATCHDOG_RUNNING != 0)
    }

    /// Stops the BMC watchdog.
    pub fn shutoff_watchdog(&self) -> IpmiResult<()> {
        let req = IpmiRq::new(IPMI_NETFN_APP, BMC_SET_WATCHDOG_TIMER).with_data(WATCHDOG_SHUTOFF);
        self.sendrecv(&req)?.check()?;
        Ok(())
    }

    pub fn get_global_enables(&self) -> IpmiResult<GlobalEnables> {
        let rsp = self.sendrecv(&IpmiRq::new(IPMI_NETFN_APP, BMC_GET_GLOBAL_ENABLES))?;
        let payload = rsp.check()?;
        let value = payload
            .first()
            .copied()
            .ok_or(IpmiError::ShortResponse { needed: 1, got: 0 })?;
        Ok(GlobalEnables::from_bits_retain(value))
    }

    pub fn set_global_enables(&self, enables: GlobalEnables) -> IpmiResult<()> {
        let req =
            IpmiRq::new(IPMI_NETFN_APP, BMC_SET_GLOBAL_ENABLES).with_data(vec![enables.bits()]);
        self.sendrecv(&req)?.check()?;
        Ok(())
    }

    /// Turns on system event logging if the BMC has a SEL device.
    ///
    /// Returns `Ok(false)` when the controller reports no SEL device.
    pub fn enable_sel(&self) -> IpmiResult<bool> {
        let devid = self.get_device_id()?;
        if !devid.provides_sel() {
            debug2!("SEL device not supported");
            return Ok(false);
        }

        let enables = self.get_global_enables()?;
        if !enables.contains(GlobalEnables::SYSTEM_EVENT_LOGGING) {
            debug2!("Enabling system event logging");
            self.set_global_enables(enables | GlobalEnables::SYSTEM_EVENT_LOGGING)?;
        }
        Ok(true)
    }
}
