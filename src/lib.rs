//! i2c-keypad - Matrix keypad driver for MCP23008 I2C I/O expanders
//!
//! Scans a row/column switch matrix wired to the 8 lines of an MCP23008,
//! debounces presses and queues confirmed keys in a small ring buffer.
//!
//! ## Features
//! - Stock 4x4, 4x3 and 3x4 layouts, or any wiring that fits on 8 lines
//! - Single-read fast path when no key is down
//! - Multi-key presses reported as conflicts and ignored until release
//! - Blocking, `nb` and async reads, plus line and integer entry helpers
//!
//! ## Architecture
//! - **Bus**: any `embedded-hal` 1.0 [`I2c`](embedded_hal::i2c::I2c) implementation
//! - **Time**: a [`Clock`] returning wrapping milliseconds ([`EmbassyClock`] on Embassy targets)
//! - **Logging**: `defmt`, behind the `defmt` feature
//!
//! ```ignore
//! let config = KeypadConfig::from_layout(Layout::Keypad4x4, DEFAULT_ADDRESS)?;
//! let mut keypad = Keypad::new(i2c, delay, EmbassyClock, config);
//! keypad.begin()?;
//! if let Some(key) = keypad.pop() { /* ... */ }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod bits;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod keypad;
pub mod layout;
pub mod register;
pub mod scanner;
pub mod types;

#[cfg(test)]
mod testing;

pub use clock::{Clock, EmbassyClock};
pub use config::{DEFAULT_ADDRESS, DEFAULT_DEBOUNCE_MS, KEYPAD_BUFFER_SIZE, NO_KEY};
pub use error::{ConfigError, Error, ReadIntError, TimedOut};
pub use keypad::Keypad;
pub use layout::{KeypadConfig, Layout};
pub use scanner::{Mcp23008Scanner, Scan};
pub use types::{KeyResult, KeyString, ScanState, StopReason, Symbol};
