/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;

use unpack::RAWDATA;

use crate::error::IpmiResult;
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::{IpmiRq, IPMI_NETFN_CHASSIS};

pub const IPMI_CHASSIS_STATUS: u8 = 0x01;

const FRONT_PANEL_BUTTONS: [(u8, &str); 4] = [
    (0x08, "Sleep"),
    (0x04, "Diag"),
    (0x02, "Reset"),
    (0x01, "Power"),
];

/// Get Chassis Status response, without the completion code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, RAWDATA)]
#[repr(C)]
#[raw_data(endian = "little")]
pub struct ChassisStatus {
    pub current_power_state: u8,
    pub last_power_event: u8,
    pub misc_chassis_state: u8,
    pub front_panel_button: u8,
}

impl ChassisStatus {
    pub fn power_on(&self) -> bool {
        self.current_power_state & 0x01 != 0
    }

    pub fn power_restore_policy(&self) -> &'static str {
        match (self.current_power_state & 0x60) >> 5 {
            0x0 => "always-off",
            0x1 => "previous",
            0x2 => "always-on",
            _ => "unknown",
        }
    }

    pub fn last_power_events(&self) -> Vec<&'static str> {
        let names = [
            (0x01u8, "ac-failed"),
            (0x02, "overload"),
            (0x04, "interlock"),
            (0x08, "fault"),
            (0x10, "command"),
        ];
        names
            .iter()
            .filter(|(bit, _)| self.last_power_event & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }
}

fn bool_str(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

impl fmt::Display for ChassisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = self.current_power_state;
        let misc = self.misc_chassis_state;

        writeln!(
            f,
            "System Power         : {}",
            if self.power_on() { "on" } else { "off" }
        )?;
        writeln!(f, "Power Overload       : {}", bool_str(power & 0x02 != 0))?;
        writeln!(f, "Power Interlock      : {}", bool_str(power & 0x04 != 0))?;
        writeln!(f, "Main Power Fault     : {}", bool_str(power & 0x08 != 0))?;
        writeln!(f, "Power Control Fault  : {}", bool_str(power & 0x10 != 0))?;
        writeln!(
            f,
            "Power Restore Policy : {}",
            self.power_restore_policy()
        )?;
        writeln!(
            f,
            "Last Power Event     : {}",
            self.last_power_events().join(", ")
        )?;
        writeln!(f, "Chassis Intrusion    : {}", active(misc & 0x01 != 0))?;
        writeln!(f, "Front-Panel Lockout  : {}", active(misc & 0x02 != 0))?;
        writeln!(f, "Drive Fault          : {}", bool_str(misc & 0x04 != 0))?;
        writeln!(f, "Cooling/Fan Fault    : {}", bool_str(misc & 0x08 != 0))?;

        let button = self.front_panel_button;
        // high nibble: disable allowed, low nibble: currently disabled
        for (bit, name) in FRONT_PANEL_BUTTONS {
            writeln!(
                f,
                "{:<21}: {}",
                format!("{} Button Disable", name),
                if button & (bit << 4) != 0 {
                    "allowed"
                } else {
                    "not allowed"
                }
            )?;
        }
        for (bit, name) in FRONT_PANEL_BUTTONS {
            writeln!(
                f,
                "{:<21}: {}",
                format!("{} Button Disabled", name),
                bool_str(button & bit != 0)
            )?;
        }
        Ok(())
    }
}

fn active(v: bool) -> &'static str {
    if v {
        "active"
    } else {
        "inactive"
    }
}

impl<I: IpmiIntf> Ipmi<I> {
    pub fn get_chassis_status(&self) -> IpmiResult<ChassisStatus> {
        let rsp = self.sendrecv(&IpmiRq::new(IPMI_NETFN_CHASSIS, IPMI_CHASSIS_STATUS))?;
        rsp.decode::<ChassisStatus>()
    }
}
