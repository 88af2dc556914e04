//! Error reporting hook
//!
//! Protocol errors never abort reception. They are logged and handed to
//! an optional application callback along with whatever context is known.

use crate::codec::Address;
use crate::error::ProtocolError;
use bytes::Bytes;
use tracing::warn;

/// Context passed to the error callback
#[derive(Debug)]
pub struct ErrorReport {
    /// Human-readable description
    pub message: String,
    /// Command address, when one was decoded
    pub address: Option<Address>,
    /// Raw bytes involved (may be empty)
    pub data: Bytes,
    /// Length relevant to the error (declared frame size, body length...)
    pub length: usize,
    /// Underlying error
    pub error: ProtocolError,
}

impl ErrorReport {
    /// Build a report whose message is the error's display text
    pub fn new(error: ProtocolError, address: Option<Address>, data: Bytes, length: usize) -> Self {
        Self {
            message: error.to_string(),
            address,
            data,
            length,
            error,
        }
    }
}

/// Callback receiving error reports
pub type ErrorCallback = Box<dyn FnMut(&ErrorReport) + Send>;

/// Forwards errors to the log and to an optional callback
#[derive(Default)]
pub struct ErrorReporter {
    callback: Option<ErrorCallback>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the callback
    pub fn set_callback(&mut self, callback: impl FnMut(&ErrorReport) + Send + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Remove the callback
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Log the report (when `log_enabled`) and forward it to the callback
    pub fn raise(&mut self, report: ErrorReport, log_enabled: bool) {
        if log_enabled {
            warn!(
                address = ?report.address,
                length = report.length,
                "{}",
                report.message
            );
        }
        if let Some(callback) = self.callback.as_mut() {
            callback(&report);
        }
    }
}
