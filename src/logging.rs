/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use env_logger::Env;
use std::env;
use std::io::Write;

/// ANSI colour and label for a record level.
fn level_style(level: log::Level) -> (&'static str, &'static str) {
    match level {
        log::Level::Error => ("\x1b[31m", "ERROR"),
        log::Level::Warn => ("\x1b[33m", "WARN "),
        log::Level::Info => ("\x1b[32m", "INFO "),
        log::Level::Debug => ("\x1b[36m", "DEBUG"),
        log::Level::Trace => ("\x1b[35m", "TRACE"),
    }
}

fn color_enabled() -> bool {
    env::var_os("NO_COLOR").is_none() && env::var("TERM").is_ok_and(|term| term != "dumb")
}

/// Filter string for a given `-v` count.
///
/// - 0: error and warn only
/// - 1: + info and `debug1`
/// - 2..=5: + `debug2` .. `debug5` (`debug5` logs at trace)
pub fn filter_for_verbosity(verbose: u8) -> String {
    let mut log_config = vec!["warn".to_string()];

    if verbose > 0 {
        log_config[0] = "info".to_string();
    }

    for level in 1..=verbose.min(5) {
        let log_level = if level <= 4 { "debug" } else { "trace" };
        log_config.push(format!("debug{}={}", level, log_level));
    }

    log_config.join(",")
}

/// Installs the global logger. `RUST_LOG`, when set, wins over `verbose`.
pub fn setup_logger(verbose: u8) {
    let color = color_enabled();
    let env = Env::default().default_filter_or(filter_for_verbosity(verbose));

    let _ = env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            // ipmitool风格：debugN 直接输出消息，无前缀
            if record.target().starts_with("debug") {
                return writeln!(buf, "{}", record.args());
            }
            let (ansi, label) = level_style(record.level());
            if color {
                writeln!(buf, "{}[{}]\x1b[0m {}", ansi, label, record.args())
            } else {
                writeln!(buf, "[{}] {}", label, record.args())
            }
        })
        .try_init();
}

/// 检查指定调试级别是否启用
pub fn is_debug_enabled(level: u8) -> bool {
    match level {
        1 => log::log_enabled!(target: "debug1", log::Level::Debug),
        2 => log::log_enabled!(target: "debug2", log::Level::Debug),
        3 => log::log_enabled!(target: "debug3", log::Level::Debug),
        4 => log::log_enabled!(target: "debug4", log::Level::Debug),
        5 => log::log_enabled!(target: "debug5", log::Level::Trace),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{debug1, debug2, debug3};

    #[test]
    fn verbosity_filters() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert_eq!(filter_for_verbosity(2), "info,debug1=debug,debug2=debug");
        assert_eq!(
            filter_for_verbosity(9),
            "info,debug1=debug,debug2=debug,debug3=debug,debug4=debug,debug5=trace"
        );
    }

    #[test]
    fn level_labels_are_aligned() {
        for level in [log::Level::Error, log::Level::Warn, log::Level::Trace] {
            assert_eq!(level_style(level).1.len(), 5);
        }
    }

    #[test]
    fn test_setup_logger() {
        setup_logger(2);
        debug1!("This is debug1 message");
        debug2!("This is debug2 message");
        debug3!("This should not appear");
    }
}
