//! sc-monitor - host-side tool for the framed command protocol
//!
//! Usage:
//!   sc-monitor ports                         List serial ports
//!   sc-monitor --port COM3 listen            Print received frames
//!   sc-monitor --port COM3 send -a 5 -d 41   Send one frame
//!   sc-monitor --port COM3 status            Query remote protocol status

mod cli;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use parking_lot::Mutex;
use serial_commands::config::{self, Config};
use serial_commands::constants::{BUILTIN_COMMAND_COUNT, POLL_IDLE_SLEEP_MS};
use serial_commands::logging::{self, parse_hex, Direction, FrameEntry};
use serial_commands::transport::SerialTransport;
use serial_commands::{Address, BuiltinCommand, Commander, ErrorReport, StatusReport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Command::Ports => list_ports(),
        Command::Listen { json, count } => listen(&config, json, count),
        Command::Send { address, data } => {
            let payload =
                parse_hex(&data).ok_or_else(|| anyhow!("Invalid hex payload: {:?}", data))?;
            send(&config, address, &payload)
        }
        Command::Status {
            address,
            timeout_ms,
        } => status(&config, address, Duration::from_millis(timeout_ms)),
        Command::SetAddressLength { value } => {
            send_builtin(&config, BuiltinCommand::SetAddressLength, &[value])?;
            eprintln!(
                "Remote address length set; pass --address-length {} for later commands",
                value.max(1)
            );
            Ok(())
        }
        Command::SetAddressFactor { value } => {
            send_builtin(&config, BuiltinCommand::SetAddressFactor, &[value])?;
            eprintln!(
                "Remote address factor set; pass --address-factor {} for later commands",
                value
            );
            Ok(())
        }
        Command::SetLog { enabled } => {
            send_builtin(&config, BuiltinCommand::SetLogEnabled, &[enabled as u8])
        }
    }
}

/// Load the config file and apply command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_strict(path)?,
        None => config::load(&config::config_path()),
    };

    if let Some(port) = &cli.port {
        config.serial.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(length) = cli.address_length {
        config.protocol.address_length = length;
    }
    if let Some(factor) = cli.address_factor {
        config.protocol.address_factor = factor;
    }

    config.protocol.validate()?;
    Ok(config)
}

/// Open the configured port as a passive peer
///
/// Built-in addresses are shadowed with no-op commands so that frames the
/// device sends there (status replies, echoes) never reconfigure or answer
/// from this side.
fn open(config: &Config) -> Result<Commander<SerialTransport>> {
    if config.serial.port.is_empty() {
        bail!("No serial port configured. Use --port or set [serial] port in the config.");
    }

    let transport = SerialTransport::open(
        &config.serial.port,
        config.serial.baud_rate,
        config.serial.timeout(),
    )?;

    let mut commander = Commander::with_state(transport, config.protocol.to_state());
    for address in 0..BUILTIN_COMMAND_COUNT as Address {
        commander.register_command(address, |_: Address, _: &[u8]| {});
    }
    commander.on_error(|report: &ErrorReport| {
        eprintln!("error: {}", report.message);
    });
    Ok(commander)
}

/// Poll until `done` returns true or `deadline` passes
fn poll_until(
    commander: &mut Commander<SerialTransport>,
    deadline: Option<Instant>,
    mut done: impl FnMut() -> bool,
) -> Result<bool> {
    loop {
        if done() {
            return Ok(true);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(false);
        }
        if !commander.poll()? {
            std::thread::sleep(Duration::from_millis(POLL_IDLE_SLEEP_MS));
        }
    }
}

fn list_ports() -> Result<()> {
    let ports = SerialTransport::available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{:<24} {}", port.name, port.description);
    }
    Ok(())
}

fn listen(config: &Config, json: bool, count: Option<usize>) -> Result<()> {
    let mut commander = open(config)?;
    let seen = Arc::new(AtomicUsize::new(0));

    let seen_handler = seen.clone();
    commander.set_generic_handler(move |address: Address, payload: &[u8]| {
        let entry = FrameEntry::new(Direction::In, address, payload);
        if json {
            match serde_json::to_string(&entry) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("error: {}", e),
            }
        } else {
            println!("{}", entry);
        }
        seen_handler.fetch_add(1, Ordering::Relaxed);
    });

    eprintln!(
        "Listening on {} @ {} baud (Ctrl+C to stop)",
        config.serial.port, config.serial.baud_rate
    );

    poll_until(&mut commander, None, || {
        count.is_some_and(|n| seen.load(Ordering::Relaxed) >= n)
    })?;
    Ok(())
}

fn send(config: &Config, address: Address, payload: &[u8]) -> Result<()> {
    let mut commander = open(config)?;
    commander
        .write(address, payload)
        .with_context(|| format!("Cannot send frame to address {}", address))?;
    println!("{}", FrameEntry::new(Direction::Out, address, payload));
    Ok(())
}

fn send_builtin(config: &Config, command: BuiltinCommand, payload: &[u8]) -> Result<()> {
    send(config, command.address(), payload)
}

fn status(config: &Config, address: Address, timeout: Duration) -> Result<()> {
    let mut commander = open(config)?;
    let reply: Arc<Mutex<Option<Vec<u8>>>> = Arc::new(Mutex::new(None));

    let reply_handler = reply.clone();
    commander.register_command(address, move |_: Address, payload: &[u8]| {
        *reply_handler.lock() = Some(payload.to_vec());
    });

    commander.write(address, &[])?;

    let deadline = Instant::now() + timeout;
    if !poll_until(&mut commander, Some(deadline), || reply.lock().is_some())? {
        bail!("No status reply within {} ms", timeout.as_millis());
    }

    let payload = reply.lock().take().unwrap_or_default();
    let report = StatusReport::parse(&payload)
        .ok_or_else(|| anyhow!("Malformed status reply: {}", logging::format_hex(&payload, " ")))?;

    println!("address_length = {}", report.address_length);
    println!("address_factor = {}", report.address_factor);
    println!("log_enabled    = {}", report.log_enabled);
    Ok(())
}
