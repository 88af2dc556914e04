//! Wire encoding for addressed frames
//!
//! Separates encoding concerns from transport and dispatch:
//! - **address**: mixed-radix address field (pure functions)
//! - **frame**: outbound frame serialization
//!
//! Both take the current [`AddressFormat`], which can change at runtime
//! through the built-in configuration commands.

pub mod address;
pub mod frame;

pub use address::{decode_address, encode_address, Address};
pub use frame::{encode_frame, max_payload_len};

use crate::constants::{DEFAULT_ADDRESS_FACTOR, DEFAULT_ADDRESS_LENGTH, MIN_ADDRESS_FACTOR};

/// Width and radix of the address field
///
/// Both values are clamped on construction: the width is at least one
/// byte and the radix at least [`MIN_ADDRESS_FACTOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFormat {
    length: usize,
    factor: u8,
}

impl AddressFormat {
    /// Create a format, clamping out-of-range values to the nearest usable one
    pub fn new(length: usize, factor: u8) -> Self {
        Self {
            length: length.max(1),
            factor: factor.max(MIN_ADDRESS_FACTOR),
        }
    }

    /// Number of address bytes per frame
    pub fn length(&self) -> usize {
        self.length
    }

    /// Radix of each address byte
    pub fn factor(&self) -> u8 {
        self.factor
    }

    /// Replace the width (0 is clamped to 1)
    pub fn set_length(&mut self, length: usize) {
        self.length = length.max(1);
    }

    /// Replace the radix (values below the minimum are clamped)
    pub fn set_factor(&mut self, factor: u8) {
        self.factor = factor.max(MIN_ADDRESS_FACTOR);
    }

    /// Largest address representable without truncation, saturating at `u32::MAX`
    pub fn max_address(&self) -> Address {
        let mut max: u64 = 1;
        for _ in 0..self.length {
            max = max.saturating_mul(self.factor as u64);
            if max > Address::MAX as u64 {
                return Address::MAX;
            }
        }
        (max - 1) as Address
    }
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_LENGTH, DEFAULT_ADDRESS_FACTOR)
    }
}
