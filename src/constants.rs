//! Protocol-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Framing
// =============================================================================

/// Sentinel byte opening a frame
pub const START_BYTE: u8 = 254;

/// Sentinel byte closing a frame
pub const STOP_BYTE: u8 = 255;

/// Bytes added around the address and payload (start, length, stop)
pub const FRAME_OVERHEAD: usize = 3;

/// Largest value the length byte may carry without colliding with a sentinel
pub const MAX_LENGTH_BYTE: usize = START_BYTE as usize - 1;

// =============================================================================
// Addressing
// =============================================================================

/// Default number of address bytes per frame
pub const DEFAULT_ADDRESS_LENGTH: usize = 1;

/// Default radix used to spread an address over its bytes
pub const DEFAULT_ADDRESS_FACTOR: u8 = 200;

/// Smallest usable radix (0 divides by zero, 1 only encodes address 0)
pub const MIN_ADDRESS_FACTOR: u8 = 2;

// =============================================================================
// Buffers
// =============================================================================

/// Initial receive buffer capacity (bytes)
pub const INITIAL_BUFFER_CAPACITY: usize = 32;

/// Receive buffer capacity multiplier applied when full
pub const BUFFER_GROWTH_FACTOR: usize = 2;

// =============================================================================
// Command tables
// =============================================================================

/// Initial slot count of the user command table
pub const INITIAL_COMMAND_SLOTS: usize = 10;

/// Extra slots allocated past the requested address when the table grows
pub const COMMAND_TABLE_GROWTH: usize = 5;

/// Number of built-in configuration commands (addresses `0..BUILTIN_COMMAND_COUNT`)
pub const BUILTIN_COMMAND_COUNT: usize = 10;

/// Separator closing each parameter triple in a status reply (`|`)
pub const STATUS_SEPARATOR: u8 = 0x7C;

// =============================================================================
// Serial
// =============================================================================

/// Default serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial read timeout (milliseconds)
pub const DEFAULT_SERIAL_TIMEOUT_MS: u64 = 10;

/// Default time to wait for a status reply (milliseconds)
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 1000;

/// Idle sleep between polls when no byte is available (milliseconds)
pub const POLL_IDLE_SLEEP_MS: u64 = 1;
