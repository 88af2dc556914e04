//! Outbound frame serialization
//!
//! Wire layout: `START | LEN | ADDR[length] | PAYLOAD | STOP`, where `LEN`
//! counts the address and payload bytes. There is no escaping, so the
//! encoder refuses any frame whose body would contain a sentinel.

use super::address::{encode_address_into, Address};
use super::AddressFormat;
use crate::constants::{FRAME_OVERHEAD, MAX_LENGTH_BYTE, START_BYTE, STOP_BYTE};
use crate::error::{ProtocolError, Result};

/// Largest payload that fits a single frame with the given address format
pub fn max_payload_len(format: AddressFormat) -> usize {
    MAX_LENGTH_BYTE.saturating_sub(format.length())
}

/// Encode one frame into the provided buffer
///
/// Clears `output`, then writes exactly `format.length() + payload.len() + 3`
/// bytes. Returns the number of bytes written.
pub fn encode_frame(
    address: Address,
    payload: &[u8],
    format: AddressFormat,
    output: &mut Vec<u8>,
) -> Result<usize> {
    let body_len = format.length() + payload.len();
    if body_len > MAX_LENGTH_BYTE {
        return Err(ProtocolError::PayloadTooLarge {
            size: body_len,
            max: MAX_LENGTH_BYTE,
        });
    }

    output.clear();
    output.reserve_exact(body_len + FRAME_OVERHEAD);

    output.push(START_BYTE);
    output.push(body_len as u8);

    let address_start = output.len();
    output.resize(address_start + format.length(), 0);
    encode_address_into(address, format, &mut output[address_start..]);

    output.extend_from_slice(payload);

    // Body starts after START and LEN
    if let Some(pos) = output[2..].iter().position(|&b| is_sentinel(b)) {
        let index = pos + 2;
        let value = output[index];
        output.clear();
        return Err(ProtocolError::ReservedByte { index, value });
    }

    output.push(STOP_BYTE);
    Ok(output.len())
}

#[inline]
fn is_sentinel(byte: u8) -> bool {
    byte == START_BYTE || byte == STOP_BYTE
}
