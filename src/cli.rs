/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use clap::{ArgAction, Args, Parser, Subcommand};

// 主命令结构
#[derive(Parser, Debug)]
#[command(
    name = "bmcipmi",
    version,
    about = "Local BMC commands over the Linux OpenIPMI device",
    max_term_width = 100
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: MainCommand,
}

// 全局参数
#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(
        short = 'v',
        action = ArgAction::Count,
        global = true,
        help = "Verbose (can use multiple times)"
    )]
    pub verbose: u8,

    #[arg(short = 'd', default_value_t = 0, global = true, help = "Use /dev/ipmiN")]
    pub devnum: u8,
}

#[derive(Subcommand, Debug)]
pub enum MainCommand {
    /// Management controller commands
    Mc {
        #[command(subcommand)]
        subcmd: McCommand,
    },

    /// Chassis commands
    Chassis {
        #[command(subcommand)]
        subcmd: ChassisCommand,
    },

    /// System event log commands
    Sel {
        #[command(subcommand)]
        subcmd: SelCommand,
    },

    /// LAN configuration commands
    Lan {
        #[command(subcommand)]
        subcmd: LanCommand,
    },

    /// Store the system firmware version on the BMC
    #[command(name = "fwversion")]
    FwVersion { version: String },

    /// Send a raw command: <netfn> <cmd> [data...] in hex
    Raw {
        #[arg(required = true, num_args = 2..)]
        bytes: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum McCommand {
    /// Get device ID and capabilities information
    Info,
    /// Watchdog timer commands
    Watchdog {
        #[command(subcommand)]
        subcmd: WatchdogCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum WatchdogCommand {
    /// Report whether the watchdog timer is running
    Status,
    /// Stop the watchdog timer
    Off,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ChassisCommand {
    /// Show chassis power and fault status
    Status,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SelCommand {
    /// Show SEL information
    Info,
    /// Turn on system event logging
    Enable,
    /// Add a 16-byte SEL record given in hex
    Add {
        #[arg(required = true, num_args = 16)]
        bytes: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum LanCommand {
    /// Read one LAN configuration parameter
    Get { channel: u8, param: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bmcipmi", "mc", "info", "-vv", "-d", "1"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.devnum, 1);
        assert!(matches!(
            cli.command,
            MainCommand::Mc {
                subcmd: McCommand::Info
            }
        ));
    }

    #[test]
    fn raw_needs_two_bytes() {
        assert!(Cli::try_parse_from(["bmcipmi", "raw", "0x06"]).is_err());
        let cli = Cli::try_parse_from(["bmcipmi", "raw", "0x06", "0x01"]).unwrap();
        match cli.command {
            MainCommand::Raw { bytes } => assert_eq!(bytes, vec!["0x06", "0x01"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn sel_add_takes_sixteen_bytes() {
        let mut args = vec!["bmcipmi", "sel", "add"];
        args.extend(["00"; 15]);
        assert!(Cli::try_parse_from(&args).is_err());
        args.push("00");
        assert!(Cli::try_parse_from(&args).is_ok());
    }
}
