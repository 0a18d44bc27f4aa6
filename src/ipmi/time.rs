/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use chrono::{TimeZone, Utc};

// IPMI特殊时间常量
pub const IPMI_TIME_UNSPECIFIED: u32 = 0xFFFFFFFF;
pub const IPMI_TIME_INIT_DONE: u32 = 0x20000000;
const SECONDS_A_DAY: u32 = 24 * 60 * 60;

/// Timestamps below this are seconds since controller init, not wall time.
pub fn ipmi_timestamp_is_special(stamp: u32) -> bool {
    stamp < IPMI_TIME_INIT_DONE
}

pub fn ipmi_timestamp_is_valid(stamp: u32) -> bool {
    stamp != IPMI_TIME_UNSPECIFIED
}

/// Renders an SEL timestamp the way ipmitool does: `MM/DD/YYYY HH:MM:SS`
/// in UTC, or `S+ ...` for pre-init counters.
pub fn ipmi_timestamp_numeric(stamp: u32) -> String {
    if !ipmi_timestamp_is_valid(stamp) {
        return "Unspecified".to_string();
    }

    if ipmi_timestamp_is_special(stamp) {
        if stamp < SECONDS_A_DAY {
            return format!("S+ {}", format_time(stamp));
        }
        let years = stamp / (365 * SECONDS_A_DAY);
        let days = (stamp % (365 * SECONDS_A_DAY)) / SECONDS_A_DAY;
        let remaining_secs = stamp % SECONDS_A_DAY;
        return format!("S+ {}/{} {}", years, days, format_time(remaining_secs));
    }

    match Utc.timestamp_opt(stamp as i64, 0).single() {
        Some(dt) => dt.format("%m/%d/%Y %H:%M:%S").to_string(),
        None => "Invalid timestamp".to_string(),
    }
}

fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_timestamps() {
        assert_eq!(ipmi_timestamp_numeric(3600), "S+ 01:00:00");
        assert_eq!(ipmi_timestamp_numeric(86400), "S+ 0/1 00:00:00");
        assert_eq!(ipmi_timestamp_numeric(90061), "S+ 0/1 01:01:01");
    }

    #[test]
    fn test_wall_clock_timestamp() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(ipmi_timestamp_numeric(1_700_000_000), "11/14/2023 22:13:20");
    }

    #[test]
    fn test_invalid_timestamp() {
        assert_eq!(ipmi_timestamp_numeric(IPMI_TIME_UNSPECIFIED), "Unspecified");
    }
}
