//! Key matrix scanning through the MCP23008
//!
//! Idle configuration: row lines are inputs with pull-ups, column lines
//! are outputs latched low. Any pressed switch then pulls its row low, so
//! one GPIO read tells whether a full sweep is needed at all.
//!
//! A sweep makes exactly one column an output at a time. With several
//! switches closed, driving two columns at once could short two outputs
//! at different levels through the matrix.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::bits;
use crate::config::{GPPU_ALL, IOCON_VALUE, SETTLE_DELAY_US};
use crate::error::Error;
use crate::layout::KeypadConfig;
use crate::register::{Register, RegisterPort};
use crate::types::{KeyResult, Symbol};

/// Source of raw (undebounced) scan results
pub trait Scan {
    type Error;

    /// Put the hardware in its idle scanning configuration
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Sweep the matrix once
    fn scan_once(&mut self) -> KeyResult;
}

/// Matrix scanner for a keypad wired to an MCP23008
pub struct Mcp23008Scanner<I2C, D> {
    port: RegisterPort<I2C>,
    delay: D,
    config: KeypadConfig,
    input_mask: u8,
    bus_faults: u32,
}

impl<I2C: I2c, D: DelayNs> Mcp23008Scanner<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: KeypadConfig) -> Self {
        let port = RegisterPort::new(i2c, config.address());
        Self {
            port,
            delay,
            input_mask: bits::mask_of(config.row_lines()),
            config,
            bus_faults: 0,
        }
    }

    pub fn config(&self) -> &KeypadConfig {
        &self.config
    }

    /// One bit set per row line
    pub fn input_mask(&self) -> u8 {
        self.input_mask
    }

    /// Bus transactions that failed during scans since construction
    pub fn bus_faults(&self) -> u32 {
        self.bus_faults
    }

    pub fn registers(&mut self) -> &mut RegisterPort<I2C> {
        &mut self.port
    }

    /// Give back the bus and the delay
    pub fn release(self) -> (I2C, D) {
        (self.port.release(), self.delay)
    }

    /// Read the port, counting a failed read as a fault
    fn read_port(&mut self) -> Option<u8> {
        match self.port.read_register(Register::Gpio) {
            Ok(value) => Some(value),
            Err(_e) => {
                self.note_fault();
                None
            }
        }
    }

    fn write_quiet(&mut self, reg: Register, value: u8) {
        if self.port.write_register(reg, value).is_err() {
            self.note_fault();
        }
    }

    fn note_fault(&mut self) {
        self.bus_faults = self.bus_faults.wrapping_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!("keypad: bus fault during scan ({} total)", self.bus_faults);
    }

    /// Rows as inputs, columns as outputs driven low
    fn restore_idle(&mut self) {
        self.write_quiet(Register::Iodir, self.input_mask);
        self.write_quiet(Register::Olat, 0);
    }

    /// Drive a single column low, every other line an input. Returns
    /// false, with the latch untouched, when the direction write failed.
    fn drive_column(&mut self, col_line: u8) -> bool {
        let pattern = bits::bit_clear(0xFF, col_line);
        if self.port.write_register(Register::Iodir, pattern).is_err() {
            self.note_fault();
            return false;
        }
        self.write_quiet(Register::Olat, pattern);
        true
    }
}

impl<I2C: I2c, D: DelayNs> Scan for Mcp23008Scanner<I2C, D> {
    type Error = Error<I2C::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.input_mask = bits::mask_of(self.config.row_lines());

        self.port.write_register(Register::Iodir, self.input_mask)?;
        self.port.write_register(Register::Ipol, 0)?;
        self.port.write_register(Register::Gpinten, 0)?;
        self.port.write_register(Register::Defval, 0)?;
        self.port.write_register(Register::Intcon, 0)?;
        self.port.write_register(Register::Iocon, IOCON_VALUE)?;
        self.port.write_register(Register::Gppu, GPPU_ALL)?;
        // INTF, INTCAP and GPIO are read only or mirrored by OLAT
        self.port.write_register(Register::Olat, 0)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "keypad: MCP23008 at 0x{:02X} ready, {}x{} matrix, input mask 0x{:02X}",
            self.port.address(),
            self.config.rows(),
            self.config.cols(),
            self.input_mask
        );
        Ok(())
    }

    fn scan_once(&mut self) -> KeyResult {
        // Quick check: every row high means nothing is pressed.
        // A failed read looks the same.
        let idle = self.read_port().unwrap_or(0xFF);
        if bits::all_high(idle, self.input_mask) {
            return KeyResult::NoKey;
        }

        let cols = self.config.cols();
        let rows = self.config.rows();
        let mut found: Option<Symbol> = None;

        for col in 0..cols {
            let col_line = self.config.col_lines()[col];
            if !self.drive_column(col_line) {
                self.restore_idle();
                return KeyResult::NoKey;
            }

            // Small settling time
            self.delay.delay_us(SETTLE_DELAY_US);

            // A failed read ends the sweep
            let Some(port) = self.read_port() else {
                self.restore_idle();
                return KeyResult::NoKey;
            };
            for row in 0..rows {
                let row_line = self.config.row_lines()[row];
                if bits::bit_read(port, row_line) != 0 {
                    continue;
                }
                if found.is_some() {
                    self.restore_idle();
                    return KeyResult::Conflict;
                }
                found = self.config.symbol_at(row, col);
            }
        }

        self.restore_idle();
        match found {
            Some(symbol) => KeyResult::Key(symbol),
            None => KeyResult::NoKey,
        }
    }
}
