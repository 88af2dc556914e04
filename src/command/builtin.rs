//! Built-in protocol configuration commands
//!
//! | addr | command            | effect                                           |
//! |------|--------------------|--------------------------------------------------|
//! | 0    | set address length | `payload[0]` (0 clamped to 1), ignored if empty  |
//! | 1    | set address factor | `payload[0]`, ignored if empty                   |
//! | 2-7  | reserved           | none                                             |
//! | 8    | set logging        | on iff `payload[0] == 1`                         |
//! | 9    | get status         | replies `(tag, value, '|')` triples              |
//!
//! These are a fallback: a user command registered at the same address wins.

use crate::codec::{Address, AddressFormat};
use crate::constants::{BUILTIN_COMMAND_COUNT, STATUS_SEPARATOR};

/// Runtime protocol parameters reconfigurable through built-in commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProtocolState {
    pub format: AddressFormat,
    pub log_enabled: bool,
}

/// Closed set of built-in commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    SetAddressLength,
    SetAddressFactor,
    /// Addresses 2 to 7, kept for future use
    Reserved(u8),
    SetLogEnabled,
    GetStatus,
}

impl BuiltinCommand {
    /// Map an address to its built-in command (`None` outside `0..BUILTIN_COMMAND_COUNT`)
    pub fn from_address(address: Address) -> Option<Self> {
        if address as usize >= BUILTIN_COMMAND_COUNT {
            return None;
        }
        Some(match address {
            0 => Self::SetAddressLength,
            1 => Self::SetAddressFactor,
            8 => Self::SetLogEnabled,
            9 => Self::GetStatus,
            n => Self::Reserved(n as u8),
        })
    }

    /// Address this command is bound to
    pub fn address(self) -> Address {
        match self {
            Self::SetAddressLength => 0,
            Self::SetAddressFactor => 1,
            Self::Reserved(n) => n as Address,
            Self::SetLogEnabled => 8,
            Self::GetStatus => 9,
        }
    }

    /// Short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::SetAddressLength => "set-address-length",
            Self::SetAddressFactor => "set-address-factor",
            Self::Reserved(_) => "reserved",
            Self::SetLogEnabled => "set-log-enabled",
            Self::GetStatus => "get-status",
        }
    }

    /// Apply the command to `state`
    ///
    /// Returns a reply payload for commands that answer (only `GetStatus`).
    pub fn apply(self, state: &mut ProtocolState, payload: &[u8]) -> Option<Vec<u8>> {
        match self {
            Self::SetAddressLength => {
                if let Some(&length) = payload.first() {
                    state.format.set_length(length as usize);
                }
                None
            }
            Self::SetAddressFactor => {
                if let Some(&factor) = payload.first() {
                    state.format.set_factor(factor);
                }
                None
            }
            Self::Reserved(_) => None,
            Self::SetLogEnabled => {
                state.log_enabled = payload.first() == Some(&1);
                None
            }
            Self::GetStatus => Some(StatusReport::from(&*state).encode()),
        }
    }
}

/// Decoded status reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub address_length: u8,
    pub address_factor: u8,
    pub log_enabled: bool,
}

impl From<&ProtocolState> for StatusReport {
    fn from(state: &ProtocolState) -> Self {
        Self {
            address_length: state.format.length().min(u8::MAX as usize) as u8,
            address_factor: state.format.factor(),
            log_enabled: state.log_enabled,
        }
    }
}

impl StatusReport {
    /// Encode as `(tag, value, 0x7C)` triples; each tag is the built-in
    /// address that sets the parameter
    pub fn encode(&self) -> Vec<u8> {
        vec![
            BuiltinCommand::SetAddressLength.address() as u8,
            self.address_length,
            STATUS_SEPARATOR,
            BuiltinCommand::SetAddressFactor.address() as u8,
            self.address_factor,
            STATUS_SEPARATOR,
            BuiltinCommand::SetLogEnabled.address() as u8,
            self.log_enabled as u8,
            STATUS_SEPARATOR,
        ]
    }

    /// Parse a status reply payload
    ///
    /// Triples are read by position: address length, address factor, log
    /// flag. The log triple may carry tag 0x01 (older firmware) or 8.
    /// Returns `None` on any other tag, a missing separator, or a length
    /// other than three triples.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() != 9 {
            return None;
        }
        let (length, factor, log) = (&payload[0..3], &payload[3..6], &payload[6..9]);
        if [length, factor, log]
            .iter()
            .any(|triple| triple[2] != STATUS_SEPARATOR)
        {
            return None;
        }

        let length_tag = BuiltinCommand::SetAddressLength.address() as u8;
        let factor_tag = BuiltinCommand::SetAddressFactor.address() as u8;
        let log_tag = BuiltinCommand::SetLogEnabled.address() as u8;
        if length[0] != length_tag
            || factor[0] != factor_tag
            || (log[0] != log_tag && log[0] != factor_tag)
        {
            return None;
        }

        Some(Self {
            address_length: length[1],
            address_factor: factor[1],
            log_enabled: log[1] == 1,
        })
    }
}
