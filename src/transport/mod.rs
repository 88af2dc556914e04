//! Transport abstraction for byte-level I/O
//!
//! Separates I/O concerns from protocol logic:
//! - **Transport**: how bytes flow (serial port, in-memory loopback...)
//! - **Protocol**: framing and dispatch (handled by `Commander`)
//!
//! The protocol polls: it asks whether a byte is available, reads at most
//! one byte per poll, and writes each outbound frame in a single call.
//!
//! # Adding a new transport
//!
//! 1. Create `transport/my_transport.rs`
//! 2. Implement the `ByteTransport` trait
//! 3. Add `pub mod my_transport;` here

pub mod memory;
pub mod serial;

pub use memory::MemoryTransport;
pub use serial::SerialTransport;

use crate::error::Result;

/// Byte-oriented, non-blocking transport
///
/// A transport does NOT handle:
/// - Framing (that's the assembler's job)
/// - Opening/configuring the link (done before handing it over)
/// - Retries or flow control
pub trait ByteTransport: Send {
    /// True when at least one byte can be read without blocking
    fn byte_available(&mut self) -> Result<bool>;

    /// Read one byte if available
    ///
    /// Returns `Ok(None)` instead of blocking when nothing is pending.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Write all bytes in one operation
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<T: ByteTransport + ?Sized> ByteTransport for Box<T> {
    fn byte_available(&mut self) -> Result<bool> {
        (**self).byte_available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
}
