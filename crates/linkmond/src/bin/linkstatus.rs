// # linkstatus - One-shot link status
//
// Resolves a single interface once and prints `iface: status`.
//
// ```bash
// linkstatus eth0
// LINKMON_LOG_LEVEL=debug linkstatus wlan0   # also logs which query answered
// ```

use anyhow::Result;
use linkmon_core::config::MAX_INTERFACE_NAME_LEN;
use linkmon_ioctl::IoctlProbe;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn usage() -> ExitCode {
    eprintln!("usage: linkstatus <interface>");
    ExitCode::from(1)
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let (Some(interface), None) = (args.next(), args.next()) else {
        return usage();
    };

    if interface.is_empty() || interface.len() > MAX_INTERFACE_NAME_LEN {
        eprintln!("invalid interface name '{}'", interface);
        return usage();
    }

    let log_level = match env::var("LINKMON_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    match report(&interface) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("linkstatus: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn report(interface: &str) -> Result<String> {
    let resolution = IoctlProbe::new().resolve(interface)?;

    match resolution.method {
        Some(method) => debug!("{} answered by {}", interface, method),
        None => debug!("{}: every query failed", interface),
    }

    Ok(format!("{}: {}", interface, resolution.status))
}
