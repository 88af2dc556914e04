//! Centralized error types for the protocol
//!
//! All protocol errors are represented by the `ProtocolError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, ProtocolError>`.

use std::fmt;
use std::path::PathBuf;

/// All protocol errors
#[derive(Debug)]
pub enum ProtocolError {
    // === Framing ===
    /// Stop byte received before (or after) the declared length was reached
    FrameSizeMismatch { declared: usize, received: usize },
    /// Completed frame cannot hold the configured address field
    FrameTooShort { length: usize, address_length: usize },
    /// Address and payload do not fit in the length byte
    PayloadTooLarge { size: usize, max: usize },
    /// Outgoing frame body would contain a sentinel byte
    ReservedByte { index: usize, value: u8 },

    // === Transport ===
    /// Failed to open serial port
    SerialOpen {
        port: String,
        source: std::io::Error,
    },
    /// Read or write on an open transport failed
    Transport { source: std::io::Error },

    // === Config ===
    /// Failed to read config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerialOpen { source, .. }
            | Self::Transport { source }
            | Self::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameSizeMismatch { declared, received } => write!(
                f,
                "Message size \"{}\" is not equal to the buffer size: {}",
                declared, received
            ),
            Self::FrameTooShort {
                length,
                address_length,
            } => write!(
                f,
                "Frame of {} bytes is shorter than the {}-byte address",
                length, address_length
            ),
            Self::PayloadTooLarge { size, max } => {
                write!(f, "Frame body too large: {} bytes (max {})", size, max)
            }
            Self::ReservedByte { index, value } => {
                write!(f, "Reserved byte 0x{:02X} at frame offset {}", value, index)
            }
            Self::SerialOpen { port, .. } => write!(f, "Cannot open serial port: {}", port),
            Self::Transport { source } => write!(f, "Transport error: {}", source),
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(source: std::io::Error) -> Self {
        Self::Transport { source }
    }
}

/// Alias for Result with ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_size_mismatch_message_names_both_sizes() {
        let err = ProtocolError::FrameSizeMismatch {
            declared: 4,
            received: 2,
        };
        let text = err.to_string();
        assert!(text.contains("\"4\""));
        assert!(text.ends_with("2"));
    }

    #[test]
    fn test_io_error_converts_to_transport() {
        let err: ProtocolError = std::io::Error::other("unplugged").into();
        assert!(matches!(err, ProtocolError::Transport { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_reserved_byte_formats_hex() {
        let err = ProtocolError::ReservedByte {
            index: 3,
            value: 0xFE,
        };
        assert_eq!(err.to_string(), "Reserved byte 0xFE at frame offset 3");
    }
}
