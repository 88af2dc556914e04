//! In-memory transport
//!
//! Incoming bytes are queued by the caller; written bytes are captured.

use super::ByteTransport;
use crate::error::Result;
use std::collections::VecDeque;

/// Queue-backed transport with captured output
#[derive(Debug, Default)]
pub struct MemoryTransport {
    incoming: VecDeque<u8>,
    written: Vec<u8>,
    writes: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with bytes already waiting to be read
    pub fn with_incoming(bytes: &[u8]) -> Self {
        let mut transport = Self::new();
        transport.push_incoming(bytes);
        transport
    }

    /// Queue bytes for reading
    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    /// Bytes still waiting to be read
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Number of `write_bytes` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Take captured output, leaving the capture empty
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// Move captured output back into the read queue
    pub fn loop_back(&mut self) {
        let written = self.take_written();
        self.push_incoming(&written);
    }
}

impl ByteTransport for MemoryTransport {
    fn byte_available(&mut self) -> Result<bool> {
        Ok(!self.incoming.is_empty())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.incoming.pop_front())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.written.extend_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}
