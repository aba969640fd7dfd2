//! Error types for keypad configuration and bus access

use core::fmt;

use embedded_hal::i2c;

use crate::config::{MAX_ADDRESS, MAX_LINES};

/// Rejected keypad configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The row line list is empty
    NoRows,
    /// The column line list is empty
    NoColumns,
    /// More row and column lines than the expander port has
    TooManyLines,
    /// A line number is not a valid expander pin (0-7)
    LineOutOfRange(u8),
    /// A line appears twice, in the same list or in both
    DuplicateLine(u8),
    /// Symbol table length does not equal rows x columns
    SymbolCountMismatch { expected: usize, found: usize },
    /// Address does not fit in 7 bits
    InvalidAddress(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoRows => f.write_str("keypad has no row lines"),
            ConfigError::NoColumns => f.write_str("keypad has no column lines"),
            ConfigError::TooManyLines => write!(f, "more than {} lines in total", MAX_LINES),
            ConfigError::LineOutOfRange(line) => write!(f, "line {} is not a pin of the expander", line),
            ConfigError::DuplicateLine(line) => write!(f, "line {} is used more than once", line),
            ConfigError::SymbolCountMismatch { expected, found } => {
                write!(f, "expected {} symbols, found {}", expected, found)
            }
            ConfigError::InvalidAddress(addr) => {
                write!(f, "address 0x{:02X} is above 0x{:02X}", addr, MAX_ADDRESS)
            }
        }
    }
}

/// Bus error raised while initializing the expander
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The I2C transaction failed
    Bus(E),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Bus(err)
    }
}

impl<E: i2c::Error> Error<E> {
    /// Generic bus error kind, for callers that do not know the HAL
    pub fn kind(&self) -> i2c::ErrorKind {
        match self {
            Error::Bus(e) => e.kind(),
        }
    }
}

/// A blocking read ran out of time before a key arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut;

/// Failure to read a number from the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadIntError {
    /// No terminator arrived before the timeout
    TimedOut,
    /// The terminator arrived with no digits before it
    Empty,
    /// A non-digit key was entered, or the value overflowed
    Invalid,
}
