//! Command handlers and lookup tables
//!
//! - **table**: user commands, indexed by address, grown on demand
//! - **builtin**: fixed protocol configuration commands at `0..BUILTIN_COMMAND_COUNT`
//!
//! User commands shadow built-ins at the same address.

pub mod builtin;
pub mod table;

pub use builtin::{BuiltinCommand, StatusReport};
pub use table::CommandTable;

use crate::codec::Address;

/// Receiver of dispatched frames
///
/// Implemented for every `FnMut(Address, &[u8]) + Send`, so plain closures
/// can be registered directly.
pub trait CommandHandler: Send {
    /// Handle one frame addressed to `address`
    fn handle(&mut self, address: Address, payload: &[u8]);
}

impl<F> CommandHandler for F
where
    F: FnMut(Address, &[u8]) + Send,
{
    fn handle(&mut self, address: Address, payload: &[u8]) {
        self(address, payload)
    }
}

/// Owned, type-erased handler
pub type BoxedHandler = Box<dyn CommandHandler>;
