//! Protocol context: reception, dispatch and transmission
//!
//! A `Commander` owns one transport and every piece of protocol state
//! (receive buffer, command tables, address format, logging flag). It is
//! driven by calling [`Commander::poll`] from the application loop; each
//! call consumes at most one byte.
//!
//! Dispatch order for a completed frame:
//! 1. the generic handler, if set (always)
//! 2. the user command at the decoded address, if registered
//! 3. otherwise the built-in command at that address, if any
//!
//! Frames for unknown addresses are dropped silently.

use crate::assembler::FrameAssembler;
use crate::codec::{decode_address, encode_frame, Address, AddressFormat};
use crate::command::builtin::ProtocolState;
use crate::command::{BoxedHandler, BuiltinCommand, CommandHandler, CommandTable};
use crate::constants::START_BYTE;
use crate::error::{ProtocolError, Result};
use crate::logging::format_hex;
use crate::report::{ErrorReport, ErrorReporter};
use crate::transport::ByteTransport;
use bytes::Bytes;
use tracing::debug;

/// Emit a debug trace only when protocol logging is on
macro_rules! protocol_log {
    ($enabled:expr, $($arg:tt)*) => {
        if $enabled {
            debug!($($arg)*);
        }
    };
}

/// Framed command protocol bound to one transport
pub struct Commander<T> {
    transport: T,
    assembler: FrameAssembler,
    state: ProtocolState,
    commands: CommandTable,
    generic: Option<BoxedHandler>,
    reporter: ErrorReporter,
    /// Reused outbound frame buffer
    write_buf: Vec<u8>,
}

impl<T: ByteTransport> Commander<T> {
    /// Create a commander with default address format and logging off
    pub fn new(transport: T) -> Self {
        Self::with_state(transport, ProtocolState::default())
    }

    /// Create a commander with explicit initial protocol state
    pub fn with_state(transport: T, state: ProtocolState) -> Self {
        Self {
            transport,
            assembler: FrameAssembler::new(),
            state,
            commands: CommandTable::new(),
            generic: None,
            reporter: ErrorReporter::new(),
            write_buf: Vec::new(),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Set the handler invoked for every dispatched frame
    pub fn set_generic_handler(&mut self, handler: impl CommandHandler + 'static) {
        self.generic = Some(Box::new(handler));
    }

    /// Remove the generic handler
    pub fn clear_generic_handler(&mut self) {
        self.generic = None;
    }

    /// Register (or overwrite) the command at `address`
    ///
    /// Addresses below `BUILTIN_COMMAND_COUNT` shadow the built-in command.
    pub fn register_command(&mut self, address: Address, handler: impl CommandHandler + 'static) {
        self.commands.register(address, handler);
    }

    /// Set the callback receiving protocol error reports
    pub fn on_error(&mut self, callback: impl FnMut(&ErrorReport) + Send + 'static) {
        self.reporter.set_callback(callback);
    }

    /// Remove the error callback
    pub fn clear_error_handler(&mut self) {
        self.reporter.clear_callback();
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Enable or disable protocol trace logging
    pub fn set_log(&mut self, enabled: bool) {
        self.state.log_enabled = enabled;
    }

    pub fn log_enabled(&self) -> bool {
        self.state.log_enabled
    }

    /// Set the address width in bytes (0 is clamped to 1)
    pub fn set_address_length(&mut self, length: usize) {
        self.state.format.set_length(length);
    }

    /// Set the address radix (values below 2 are clamped)
    pub fn set_address_factor(&mut self, factor: u8) {
        self.state.format.set_factor(factor);
    }

    pub fn address_format(&self) -> AddressFormat {
        self.state.format
    }

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the commander and return its transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    // =========================================================================
    // Reception
    // =========================================================================

    /// Consume at most one byte from the transport
    ///
    /// Returns `Ok(true)` when a byte was consumed. Framing problems go to
    /// the error callback; only transport failures are returned as `Err`.
    pub fn poll(&mut self) -> Result<bool> {
        if !self.transport.byte_available()? {
            return Ok(false);
        }
        match self.transport.read_byte()? {
            Some(byte) => {
                self.feed(byte)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Poll until the transport has nothing more to read
    ///
    /// Returns the number of bytes consumed.
    pub fn poll_all(&mut self) -> Result<usize> {
        let mut consumed = 0;
        while self.poll()? {
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Feed one byte as if it came from the transport
    pub fn feed(&mut self, byte: u8) -> Result<()> {
        let log = self.state.log_enabled;
        protocol_log!(log, byte, "rx byte");

        if byte == START_BYTE && !self.assembler.is_idle() {
            protocol_log!(
                log,
                received = self.assembler.received(),
                "discarding partial frame"
            );
        }

        match self.assembler.feed(byte) {
            Ok(Some(frame)) => {
                protocol_log!(log, size = frame.len(), "stop byte received");
                self.dispatch(frame)
            }
            Ok(None) => Ok(()),
            Err(error) => {
                let length = match &error {
                    ProtocolError::FrameSizeMismatch { declared, .. } => *declared,
                    _ => 0,
                };
                self.raise(ErrorReport::new(error, None, Bytes::new(), length));
                Ok(())
            }
        }
    }

    /// Route a completed frame body (address + payload) to its handlers
    pub fn dispatch(&mut self, frame: Bytes) -> Result<()> {
        let log = self.state.log_enabled;
        let format = self.state.format;

        if frame.len() < format.length() {
            let length = frame.len();
            self.raise(ErrorReport::new(
                ProtocolError::FrameTooShort {
                    length,
                    address_length: format.length(),
                },
                None,
                frame,
                length,
            ));
            return Ok(());
        }

        let address = decode_address(&frame, format);
        let payload = frame.slice(format.length()..);
        protocol_log!(log, address, size = payload.len(), "processing command");

        if let Some(generic) = self.generic.as_mut() {
            protocol_log!(log, address, "calling generic handler");
            generic.handle(address, &payload);
        }

        if let Some(handler) = self.commands.get_mut(address) {
            protocol_log!(log, address, "calling command");
            handler.handle(address, &payload);
        } else if let Some(builtin) = BuiltinCommand::from_address(address) {
            protocol_log!(log, address, command = builtin.name(), "calling built-in command");
            if let Some(reply) = builtin.apply(&mut self.state, &payload) {
                self.send_reply(address, &reply)?;
            }
            protocol_log!(
                self.state.log_enabled,
                address_length = self.state.format.length(),
                address_factor = self.state.format.factor(),
                "built-in command applied"
            );
        } else {
            protocol_log!(log, address, "no handler, frame dropped");
        }

        Ok(())
    }

    // =========================================================================
    // Transmission
    // =========================================================================

    /// Send one frame to `address`
    ///
    /// The frame is built in a single buffer and handed to the transport
    /// in one write.
    pub fn write(&mut self, address: Address, payload: &[u8]) -> Result<()> {
        let log = self.state.log_enabled;
        protocol_log!(log, address, "writing command");

        encode_frame(address, payload, self.state.format, &mut self.write_buf)?;
        protocol_log!(log, frame = %format_hex(&self.write_buf, " "), "tx frame");

        self.transport.write_bytes(&self.write_buf)
    }

    /// Write a built-in reply; encoding problems are reported, transport errors returned
    fn send_reply(&mut self, address: Address, reply: &[u8]) -> Result<()> {
        match self.write(address, reply) {
            Err(error @ ProtocolError::Transport { .. }) => Err(error),
            Err(error) => {
                let length = reply.len();
                self.raise(ErrorReport::new(
                    error,
                    Some(address),
                    Bytes::copy_from_slice(reply),
                    length,
                ));
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    fn raise(&mut self, report: ErrorReport) {
        self.reporter.raise(report, self.state.log_enabled);
    }
}
