//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use serial_commands::constants::DEFAULT_REPLY_TIMEOUT_MS;

// =============================================================================
// CLI Definition
// =============================================================================

/// Monitor and drive devices speaking the framed command protocol
#[derive(Parser, Debug)]
#[command(name = "sc-monitor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: config.toml next to the executable)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Serial port to use (overrides config)
    #[arg(long, value_name = "PORT", global = true)]
    pub port: Option<String>,

    /// Baud rate (overrides config)
    #[arg(long, value_name = "BAUD", global = true)]
    pub baud: Option<u32>,

    /// Local address width in bytes (overrides config)
    #[arg(long, value_name = "BYTES", global = true)]
    pub address_length: Option<usize>,

    /// Local address radix (overrides config)
    #[arg(long, value_name = "FACTOR", global = true)]
    pub address_factor: Option<u8>,

    #[command(subcommand)]
    pub command: Command,
}

/// Monitor subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available serial ports
    Ports,

    /// Print every frame received
    Listen {
        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,

        /// Exit after this many frames
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },

    /// Send one frame
    Send {
        /// Destination address
        #[arg(short, long)]
        address: u32,

        /// Payload as hex (e.g. "41 42" or "4142")
        #[arg(short, long, default_value = "")]
        data: String,
    },

    /// Query the remote protocol status (built-in command 9)
    Status {
        /// Address the status query is sent to
        #[arg(long, default_value_t = 9)]
        address: u32,

        /// Time to wait for the reply in milliseconds
        #[arg(long, value_name = "MS", default_value_t = DEFAULT_REPLY_TIMEOUT_MS)]
        timeout_ms: u64,
    },

    /// Change the remote address width (built-in command 0)
    SetAddressLength { value: u8 },

    /// Change the remote address radix (built-in command 1)
    SetAddressFactor { value: u8 },

    /// Turn remote protocol logging on or off (built-in command 8)
    SetLog {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

// =============================================================================
// Tests
// =============================================================================
