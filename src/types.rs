//! Common types shared by the scanner, the debouncer and the keypad API
//!
//! This module contains the scan result, the debouncer state and the
//! result type of the multi-key readers.

use heapless::Vec;

use crate::config::KEYPAD_BUFFER_SIZE;

/// Symbol produced by the keypad's lookup table (usually an ASCII byte)
pub type Symbol = u8;

/// Outcome of one sweep of the key matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyResult {
    /// Every row line reads high
    NoKey,
    /// More than one switch is closed
    Conflict,
    /// Exactly one switch is closed
    Key(Symbol),
}

impl KeyResult {
    /// Symbol of a single pressed key, if any
    pub fn symbol(&self) -> Option<Symbol> {
        match *self {
            KeyResult::Key(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// True when at least one switch is closed (single key or conflict)
    pub fn is_pressed(&self) -> bool {
        !matches!(self, KeyResult::NoKey)
    }
}

/// State of the debounce state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanState {
    /// Idle, looking for a new key press
    #[default]
    AwaitingPress,
    /// A key was seen once, waiting one interval to confirm it
    AwaitingDebounce,
    /// A key was accepted or a conflict seen; waiting until all keys are up
    AwaitingRelease,
}

/// Why `read_keys_until` stopped collecting keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// The terminator key was pressed
    Terminator,
    /// The requested number of keys was collected
    MaxReached,
    /// No key arrived within the timeout
    TimedOut,
}

/// Keys collected by `read_keys_until`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyString {
    /// Keys in the order they were pressed, terminator excluded
    pub keys: Vec<Symbol, KEYPAD_BUFFER_SIZE>,
    pub stop: StopReason,
}

impl KeyString {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            stop: StopReason::TimedOut,
        }
    }

    /// The keys as text, when the symbol table holds ASCII/UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.keys).ok()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyString {
    fn default() -> Self {
        Self::new()
    }
}
