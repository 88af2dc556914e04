//! Receive-side frame assembly
//!
//! Consumes the transport one byte at a time and reassembles frames of the
//! form `START | LEN | BODY[LEN] | STOP`. Only the body (address + payload)
//! is buffered; sentinels and the length byte are not stored.
//!
//! State rules:
//! - `START` always resets, silently discarding a partial frame.
//! - The first other byte after a reset is the declared body length.
//! - Further bytes are body bytes.
//! - `STOP` completes the frame when the body count matches the declared
//!   length, otherwise it reports a size mismatch. Both paths reset.

use crate::constants::{BUFFER_GROWTH_FACTOR, INITIAL_BUFFER_CAPACITY, START_BYTE, STOP_BYTE};
use crate::error::{ProtocolError, Result};
use bytes::Bytes;

/// Single-frame assembler with a doubling receive buffer
pub struct FrameAssembler {
    buffer: Vec<u8>,
    /// Declared body length; `None` until the length byte arrives
    declared: Option<usize>,
    /// Body bytes seen since the length byte (may exceed `declared`)
    received: usize,
    growth_factor: usize,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler with the default capacity and growth policy
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_BUFFER_CAPACITY, BUFFER_GROWTH_FACTOR)
    }

    /// Create an assembler with an explicit initial capacity and growth multiplier
    ///
    /// A multiplier below 2 is raised to 2 so that the buffer always grows.
    pub fn with_capacity(capacity: usize, growth_factor: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity.max(1)),
            declared: None,
            received: 0,
            growth_factor: growth_factor.max(2),
        }
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(body))` when a frame completes, `Ok(None)` while
    /// accumulating, and `Err(FrameSizeMismatch)` when a stop byte arrives
    /// with the wrong body size.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Bytes>> {
        match byte {
            START_BYTE => {
                self.reset();
                Ok(None)
            }
            STOP_BYTE => {
                let outcome = match self.declared {
                    Some(declared) if declared == self.received => {
                        Ok(Some(Bytes::copy_from_slice(&self.buffer)))
                    }
                    declared => Err(ProtocolError::FrameSizeMismatch {
                        declared: declared.unwrap_or(0),
                        received: self.received,
                    }),
                };
                self.reset();
                outcome
            }
            _ => {
                match self.declared {
                    None => self.declared = Some(byte as usize),
                    Some(declared) => {
                        if self.received < declared {
                            self.push(byte);
                        }
                        self.received += 1;
                    }
                }
                Ok(None)
            }
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.declared = None;
        self.received = 0;
    }

    /// Declared body length of the frame in progress
    pub fn declared_len(&self) -> Option<usize> {
        self.declared
    }

    /// Body bytes received for the frame in progress
    pub fn received(&self) -> usize {
        self.received
    }

    /// Bytes buffered for the frame in progress
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Current buffer capacity
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// True when no frame is in progress
    pub fn is_idle(&self) -> bool {
        self.declared.is_none()
    }

    fn push(&mut self, byte: u8) {
        if self.buffer.len() == self.buffer.capacity() {
            let capacity = self.buffer.capacity();
            self.buffer
                .reserve_exact(capacity * (self.growth_factor - 1));
        }
        self.buffer.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(assembler: &mut FrameAssembler, bytes: &[u8]) -> Vec<Result<Option<Bytes>>> {
        bytes.iter().map(|&b| assembler.feed(b)).collect()
    }

    fn frames(results: Vec<Result<Option<Bytes>>>) -> Vec<Bytes> {
        results.into_iter().filter_map(|r| r.ok().flatten()).collect()
    }

    #[test]
    fn test_complete_frame() {
        let mut assembler = FrameAssembler::new();
        let out = frames(feed_all(&mut assembler, &[254, 2, 5, 0x41, 255]));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref(), &[5, 0x41]);
        assert!(assembler.is_idle());
    }

    #[test]
    fn test_frame_only_on_stop() {
        let mut assembler = FrameAssembler::new();
        let results = feed_all(&mut assembler, &[254, 3, 1, 2, 3]);
        assert!(results.iter().all(|r| matches!(r, Ok(None))));
        assert_eq!(assembler.declared_len(), Some(3));
        assert_eq!(assembler.received(), 3);
    }

    #[test]
    fn test_start_discards_partial_frame() {
        let mut assembler = FrameAssembler::new();
        let results = feed_all(&mut assembler, &[254, 4, 1, 2, 254, 2, 7, 8, 255]);

        let errors = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(errors, 0);
        let out = frames(results);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref(), &[7, 8]);
    }

    #[test]
    fn test_start_resets_state() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, &[254, 4, 1, 2]);
        assert!(!assembler.is_idle());

        assert!(matches!(assembler.feed(START_BYTE), Ok(None)));
        assert!(assembler.is_idle());
        assert_eq!(assembler.received(), 0);
        assert!(assembler.buffered().is_empty());
    }

    #[test]
    fn test_short_frame_is_size_mismatch() {
        let mut assembler = FrameAssembler::new();
        let results = feed_all(&mut assembler, &[254, 4, 1, 2, 255]);

        let errors: Vec<_> = results.into_iter().filter_map(|r| r.err()).collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ProtocolError::FrameSizeMismatch {
                declared: 4,
                received: 2
            }
        ));
        assert!(assembler.is_idle());
    }

    #[test]
    fn test_overrun_counts_but_does_not_store() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, &[254, 1, 1, 2, 3]);
        assert_eq!(assembler.buffered(), &[1]);

        let err = assembler.feed(STOP_BYTE).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::FrameSizeMismatch {
                declared: 1,
                received: 3
            }
        ));
    }

    #[test]
    fn test_stop_without_length_is_mismatch() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, &[254]);
        let err = assembler.feed(STOP_BYTE).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::FrameSizeMismatch {
                declared: 0,
                received: 0
            }
        ));
    }

    #[test]
    fn test_zero_length_is_empty_frame() {
        let mut assembler = FrameAssembler::new();
        let out = frames(feed_all(&mut assembler, &[254, 0, 255]));
        assert_eq!(out.len(), 1);
        assert!(out[0].is_empty());
    }

    #[test]
    fn test_zero_length_then_data_is_mismatch() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, &[254, 0, 5]);
        assert_eq!(assembler.declared_len(), Some(0));
        assert!(assembler.feed(STOP_BYTE).is_err());
    }

    #[test]
    fn test_length_without_start() {
        // A fresh assembler treats the first byte as the length, like after START
        let mut assembler = FrameAssembler::new();
        let out = frames(feed_all(&mut assembler, &[1, 9, 255]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref(), &[9]);
    }

    #[test]
    fn test_buffer_grows_by_doubling() {
        let mut assembler = FrameAssembler::with_capacity(4, 2);
        let initial = assembler.capacity();

        let mut input = vec![254, 10];
        input.extend(0..10u8);
        input.push(255);
        let out = frames(feed_all(&mut assembler, &input));

        assert_eq!(out[0].as_ref(), &(0..10u8).collect::<Vec<_>>()[..]);
        assert!(assembler.capacity() >= initial * 2);
    }

    #[test]
    fn test_payload_longer_than_initial_capacity() {
        let mut assembler = FrameAssembler::new();
        let body: Vec<u8> = (0..100u8).collect();

        let mut input = vec![254, body.len() as u8];
        input.extend_from_slice(&body);
        input.push(255);
        let out = frames(feed_all(&mut assembler, &input));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref(), &body[..]);
        assert!(assembler.capacity() >= INITIAL_BUFFER_CAPACITY * 2);
    }

    #[test]
    fn test_capacity_kept_between_frames() {
        let mut assembler = FrameAssembler::new();
        let mut input = vec![254, 64];
        input.extend(std::iter::repeat(1u8).take(64));
        input.push(255);
        feed_all(&mut assembler, &input);
        let grown = assembler.capacity();

        feed_all(&mut assembler, &[254, 1, 2, 255]);
        assert_eq!(assembler.capacity(), grown);
    }

    proptest! {
        #[test]
        fn assembles_any_body(body in proptest::collection::vec(0u8..START_BYTE, 0..=253)) {
            let mut assembler = FrameAssembler::new();
            let mut input = vec![START_BYTE, body.len() as u8];
            input.extend_from_slice(&body);
            input.push(STOP_BYTE);

            let results = feed_all(&mut assembler, &input);
            prop_assert!(results.iter().all(|r| r.is_ok()));
            let out = frames(results);
            prop_assert_eq!(out.len(), 1);
            prop_assert_eq!(out[0].as_ref(), &body[..]);
        }
    }
}
