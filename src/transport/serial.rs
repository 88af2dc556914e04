//! Serial port transport
//!
//! Wraps a `serialport` handle opened with a short read timeout. Reads
//! are chunked into a small pending buffer so that polling one byte at a
//! time does not cost one system call per byte.

use super::ByteTransport;
use crate::error::{ProtocolError, Result};
use bytes::{Buf, BytesMut};
use serialport::{SerialPortInfo, SerialPortType};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

/// Maximum bytes pulled from the port per read call
const READ_CHUNK_SIZE: usize = 256;

/// Serial transport over an open port
///
/// # Example
///
/// ```ignore
/// let transport = SerialTransport::open("/dev/ttyACM0", 9600, Duration::from_millis(10))?;
/// let mut commander = Commander::new(transport);
/// ```
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    pending: BytesMut,
}

/// Summary of an available port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub description: String,
}

impl SerialTransport {
    /// Open `port_name` at `baud_rate`
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| ProtocolError::SerialOpen {
                port: port_name.to_string(),
                source: e.into(),
            })?;
        Ok(Self::from_port(port))
    }

    /// Wrap an already opened port
    pub fn from_port(port: Box<dyn serialport::SerialPort>) -> Self {
        Self {
            port,
            pending: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Name of the underlying port, when the platform reports one
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }

    /// List serial ports present on the system
    pub fn available_ports() -> Result<Vec<PortSummary>> {
        let ports = serialport::available_ports().map_err(|e| ProtocolError::Transport {
            source: e.into(),
        })?;
        Ok(ports.iter().map(summarize).collect())
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        match self.port.read(&mut chunk) {
            Ok(n) => {
                self.pending.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn summarize(port: &SerialPortInfo) -> PortSummary {
    let description = match &port.port_type {
        SerialPortType::UsbPort(usb) => format!(
            "USB {:04X}:{:04X} {}",
            usb.vid,
            usb.pid,
            usb.product.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    };
    PortSummary {
        name: port.port_name.clone(),
        description,
    }
}

impl ByteTransport for SerialTransport {
    fn byte_available(&mut self) -> Result<bool> {
        if self.pending.has_remaining() {
            return Ok(true);
        }
        let waiting = self.port.bytes_to_read().map_err(|e| ProtocolError::Transport {
            source: e.into(),
        })?;
        Ok(waiting > 0)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if !self.pending.has_remaining() {
            self.fill()?;
        }
        if self.pending.has_remaining() {
            Ok(Some(self.pending.get_u8()))
        } else {
            Ok(None)
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_pci_port() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::PciPort,
        };
        let summary = summarize(&info);
        assert_eq!(summary.name, "/dev/ttyS0");
        assert_eq!(summary.description, "PCI");
    }

    #[test]
    fn test_summarize_unknown_port() {
        let info = SerialPortInfo {
            port_name: "COM1".to_string(),
            port_type: SerialPortType::Unknown,
        };
        assert_eq!(summarize(&info).description, "Unknown");
    }

    #[cfg(unix)]
    #[test]
    fn test_open_missing_port_keeps_error_kind() {
        let timeout = Duration::from_millis(10);
        let err = SerialTransport::open("/dev/no-such-serial-port", 9600, timeout)
            .err()
            .expect("opening a missing port should fail");
        match err {
            ProtocolError::SerialOpen { port, source } => {
                assert_eq!(port, "/dev/no-such-serial-port");
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("Expected SerialOpen, got {:?}", other),
        }
    }
}
