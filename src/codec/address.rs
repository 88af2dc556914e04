//! Mixed-radix address field
//!
//! An address is written big-endian across `length` bytes, each byte a
//! digit in base `factor`:
//!
//! `address = Σ bytes[i] * factor^(length - 1 - i)`
//!
//! With the default format (1 byte, radix 200) addresses 0..=199 fit.
//! Address 314 needs two bytes: `[1, 114]` (1 × 200 + 114).

use super::AddressFormat;

/// Numeric command address
pub type Address = u32;

/// Encode `address` into exactly `format.length()` bytes, most significant first
///
/// Digits beyond the field width are silently dropped; choosing a wide
/// enough format is the caller's job.
pub fn encode_address(address: Address, format: AddressFormat) -> Vec<u8> {
    let mut out = vec![0u8; format.length()];
    encode_address_into(address, format, &mut out);
    out
}

/// Encode into a caller-provided slice (the whole slice is the address field)
pub fn encode_address_into(address: Address, format: AddressFormat, out: &mut [u8]) {
    let factor = format.factor() as Address;
    let mut remaining = address;

    for digit in out.iter_mut().rev() {
        *digit = (remaining % factor) as u8;
        remaining /= factor;
    }
}

/// Decode the first `format.length()` bytes of `bytes` as an address
///
/// Saturates at `Address::MAX` instead of overflowing. Missing bytes
/// (a slice shorter than the field) are treated as absent digits.
pub fn decode_address(bytes: &[u8], format: AddressFormat) -> Address {
    let factor = format.factor() as Address;

    bytes
        .iter()
        .take(format.length())
        .fold(0, |acc: Address, &digit| {
            acc.saturating_mul(factor).saturating_add(digit as Address)
        })
}
