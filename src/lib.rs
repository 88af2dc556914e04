//! Framed command protocol over byte-oriented links
//!
//! Frames look like `START | LEN | ADDR[n] | PAYLOAD | STOP` (sentinels 254
//! and 255). The address is a mixed-radix number spread over `n` bytes.
//! A [`Commander`] assembles incoming frames one byte at a time and routes
//! each payload to a generic handler, a user command registered at its
//! address, or a built-in configuration command.
//!
//! ```ignore
//! use serial_commands::{Commander, transport::MemoryTransport};
//!
//! let mut commander = Commander::new(MemoryTransport::with_incoming(&[254, 2, 5, 0x41, 255]));
//! commander.register_command(5, |address, payload: &[u8]| {
//!     println!("{} -> {:?}", address, payload);
//! });
//! commander.poll_all()?;
//! ```

pub mod assembler;
pub mod codec;
pub mod command;
pub mod commander;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod report;
pub mod transport;

pub use codec::{Address, AddressFormat};
pub use command::builtin::ProtocolState;
pub use command::{BuiltinCommand, CommandHandler, StatusReport};
pub use commander::Commander;
pub use error::{ProtocolError, Result};
pub use report::ErrorReport;
