//! Keypad layouts and validated driver configuration
//!
//! A keypad is described by which expander lines its rows and columns are
//! wired to, and by a row-major table mapping each switch to the symbol it
//! produces. [`Layout`] lists the stock keypads found on common MCP23008
//! backpack boards; [`KeypadConfig`] accepts any wiring that fits on the
//! expander's single 8-bit port.

use heapless::Vec;

use crate::config::{DEFAULT_DEBOUNCE_MS, MAX_ADDRESS, MAX_KEYS, MAX_LINES};
use crate::error::ConfigError;
use crate::types::Symbol;

/// Stock keypads with their usual backpack wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layout {
    /// 16-key keypad with A-D column, rows on GP0-3, columns on GP4-7
    Keypad4x4,
    /// 12-key telephone keypad, rows on GP0-3, columns on GP4-6
    Keypad4x3,
    /// 12-key keypad with letters, rows on GP0-2, columns on GP3-6
    Keypad3x4,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Keypad4x4, Layout::Keypad4x3, Layout::Keypad3x4];

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Keypad4x4 => "4x4 keypad",
            Layout::Keypad4x3 => "4x3 telephone keypad",
            Layout::Keypad3x4 => "3x4 keypad",
        }
    }

    pub fn row_lines(&self) -> &'static [u8] {
        match self {
            Layout::Keypad4x4 | Layout::Keypad4x3 => &[0, 1, 2, 3],
            Layout::Keypad3x4 => &[0, 1, 2],
        }
    }

    pub fn col_lines(&self) -> &'static [u8] {
        match self {
            Layout::Keypad4x4 => &[4, 5, 6, 7],
            Layout::Keypad4x3 => &[4, 5, 6],
            Layout::Keypad3x4 => &[3, 4, 5, 6],
        }
    }

    /// Row-major symbol table
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Layout::Keypad4x4 => b"123A456B789C*0#D",
            Layout::Keypad4x3 => b"123456789*0#",
            Layout::Keypad3x4 => b"123A456B789C",
        }
    }

    pub fn rows(&self) -> usize {
        self.row_lines().len()
    }

    pub fn cols(&self) -> usize {
        self.col_lines().len()
    }

    pub fn total_keys(&self) -> usize {
        self.rows() * self.cols()
    }
}

/// Everything the driver needs to know about one keypad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadConfig {
    symbols: Vec<Symbol, MAX_KEYS>,
    row_lines: Vec<u8, MAX_LINES>,
    col_lines: Vec<u8, MAX_LINES>,
    debounce_ms: u16,
    address: u8,
}

impl KeypadConfig {
    /// Validate and build a configuration.
    ///
    /// `symbols` is row-major: the key at (row, col) produces
    /// `symbols[row * col_lines.len() + col]`.
    pub fn new(
        symbols: &[Symbol],
        row_lines: &[u8],
        col_lines: &[u8],
        debounce_ms: u16,
        address: u8,
    ) -> Result<Self, ConfigError> {
        if row_lines.is_empty() {
            return Err(ConfigError::NoRows);
        }
        if col_lines.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        if row_lines.len() + col_lines.len() > MAX_LINES {
            return Err(ConfigError::TooManyLines);
        }
        if address > MAX_ADDRESS {
            return Err(ConfigError::InvalidAddress(address));
        }

        let mut seen = 0u8;
        for &line in row_lines.iter().chain(col_lines) {
            if line as usize >= MAX_LINES {
                return Err(ConfigError::LineOutOfRange(line));
            }
            if seen & (1 << line) != 0 {
                return Err(ConfigError::DuplicateLine(line));
            }
            seen |= 1 << line;
        }

        let expected = row_lines.len() * col_lines.len();
        if symbols.len() != expected {
            return Err(ConfigError::SymbolCountMismatch {
                expected,
                found: symbols.len(),
            });
        }

        let mut config = Self {
            symbols: Vec::new(),
            row_lines: Vec::new(),
            col_lines: Vec::new(),
            debounce_ms,
            address,
        };
        config.symbols.extend_from_slice(symbols).map_err(|_| ConfigError::TooManyLines)?;
        config.row_lines.extend_from_slice(row_lines).map_err(|_| ConfigError::TooManyLines)?;
        config.col_lines.extend_from_slice(col_lines).map_err(|_| ConfigError::TooManyLines)?;
        Ok(config)
    }

    /// Configuration for a stock layout with the default debounce interval
    pub fn from_layout(layout: Layout, address: u8) -> Result<Self, ConfigError> {
        Self::new(
            layout.symbols(),
            layout.row_lines(),
            layout.col_lines(),
            DEFAULT_DEBOUNCE_MS,
            address,
        )
    }

    /// Replace the debounce interval
    pub fn with_debounce_ms(mut self, debounce_ms: u16) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn row_lines(&self) -> &[u8] {
        &self.row_lines
    }

    pub fn col_lines(&self) -> &[u8] {
        &self.col_lines
    }

    pub fn rows(&self) -> usize {
        self.row_lines.len()
    }

    pub fn cols(&self) -> usize {
        self.col_lines.len()
    }

    pub fn debounce_ms(&self) -> u16 {
        self.debounce_ms
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Symbol for the switch at (row, col), both zero-based indexes
    pub fn symbol_at(&self, row: usize, col: usize) -> Option<Symbol> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.symbols.get(row * self.cols() + col).copied()
    }
}
