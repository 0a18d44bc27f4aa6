/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
mod cli;

use clap::Parser;
use cli::{ChassisCommand, Cli, LanCommand, MainCommand, McCommand, SelCommand, WatchdogCommand};

use bmcipmi::commands::lan::lan_param_name;
use bmcipmi::commands::sel::SelEventRecord;
use bmcipmi::error::IpmiResult;
use bmcipmi::helper::{buf2str, parse_hex_bytes};
use bmcipmi::interface::open::OpenIntf;
use bmcipmi::ipmi::intf::{Ipmi, IpmiIntf};
use bmcipmi::{debug1, logging};

fn run<I: IpmiIntf>(ipmi: &Ipmi<I>, command: MainCommand) -> IpmiResult<()> {
    match command {
        MainCommand::Mc { subcmd } => match subcmd {
            McCommand::Info => print!("{}", ipmi.get_device_id()?),
            McCommand::Watchdog { subcmd } => match subcmd {
                WatchdogCommand::Status => {
                    let running = ipmi.watchdog_running()?;
                    println!(
                        "Watchdog Timer Is  : {}",
                        if running { "Started/Running" } else { "Stopped" }
                    );
                }
                WatchdogCommand::Off => {
                    ipmi.shutoff_watchdog()?;
                    println!("Watchdog Timer Shutoff successful -- timer stopped");
                }
            },
        },
        MainCommand::Chassis { subcmd } => match subcmd {
            ChassisCommand::Status => print!("{}", ipmi.get_chassis_status()?),
        },
        MainCommand::Sel { subcmd } => match subcmd {
            SelCommand::Info => println!("{}", ipmi.get_sel_info()?),
            SelCommand::Enable => {
                if ipmi.enable_sel()? {
                    println!("System event logging enabled");
                } else {
                    println!("SEL device not supported");
                }
            }
            SelCommand::Add { bytes } => {
                let record = SelEventRecord::decode(&parse_hex_bytes(&bytes)?)?;
                debug1!("{}", record);
                ipmi.log_system_event(&record)?;
                println!("Added SEL entry");
            }
        },
        MainCommand::Lan { subcmd } => match subcmd {
            LanCommand::Get { channel, param } => {
                let rsp = ipmi.get_lan_config(channel, param)?;
                println!("{:<20}: {}", lan_param_name(param), buf2str(&rsp));
            }
        },
        MainCommand::FwVersion { version } => {
            ipmi.set_system_fw_version(&version)?;
            println!("System firmware version set");
        }
        MainCommand::Raw { bytes } => {
            let rsp = ipmi.raw_cmd(&parse_hex_bytes(&bytes)?)?;
            println!("{}", buf2str(&rsp));
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logger(cli.global.verbose);

    let ipmi = Ipmi::new(OpenIntf::new(cli.global.devnum));
    let result = run(&ipmi, cli.command);

    let _ = ipmi.with_intf(|intf| intf.close());
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
