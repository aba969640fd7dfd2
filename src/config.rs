//! Driver configuration for i2c-keypad
//! MCP23008-based matrix keypad backpacks

// ===================================================================
// Bus Configuration
// ===================================================================

/// 7-bit I2C address of an MCP23008 with A0..A2 tied low
pub const DEFAULT_ADDRESS: u8 = 0x20;
/// Highest valid 7-bit I2C address
pub const MAX_ADDRESS: u8 = 0x7F;

// ===================================================================
// MCP23008 Configuration
// ===================================================================

/// IOCON value written at init:
///   bit 5 SEQOP  = 1  sequential operation disabled
///   bit 2 ODR    = 1  INT pin is open-drain
///   bit 1 INTPOL = 0  INT active-low
pub const IOCON_VALUE: u8 = 0x24;

/// Enable the pull-up on every line; column lines ignore it while driven
pub const GPPU_ALL: u8 = 0xFF;

/// Number of GPIO lines on the expander (one 8-bit port)
pub const MAX_LINES: usize = 8;

/// Largest possible matrix on 8 lines (4 rows x 4 columns)
pub const MAX_KEYS: usize = 16;

// ===================================================================
// Scanning Configuration
// ===================================================================

pub const SETTLE_DELAY_US: u32 = 10; // Column drive to row read propagation
pub const DEFAULT_DEBOUNCE_MS: u16 = 10; // Debounce interval
pub const POLL_INTERVAL_MS: u32 = 1; // Async wait re-poll period

// ===================================================================
// Key Buffer Configuration
// ===================================================================

/// Capacity of the key buffer, and the longest string `read_keys_until` returns
pub const KEYPAD_BUFFER_SIZE: usize = 32;

/// Byte returned by the byte-level helpers when no key is available
pub const NO_KEY: u8 = 0;
