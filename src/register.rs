//! MCP23008 register access over I2C
//!
//! Every access is a single synchronous bus transaction (two for the
//! read-modify-write of `write_bit`). Nothing is retried here; callers
//! decide what a failed transaction means.

use embedded_hal::i2c::I2c;

use crate::bits;

/// MCP23008 register map (IOCON.BANK is not present on this part)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// I/O direction, 1 = input (power on = 0xFF)
    Iodir = 0x00,
    /// Input polarity, 1 = inverted
    Ipol = 0x01,
    /// Interrupt-on-change enable
    Gpinten = 0x02,
    /// Default compare value for interrupt-on-change
    Defval = 0x03,
    /// Interrupt control, 1 = compare against DEFVAL
    Intcon = 0x04,
    /// Device configuration
    Iocon = 0x05,
    /// Pull-up enable, 1 = 100k pull-up on
    Gppu = 0x06,
    /// Interrupt flags (read only)
    Intf = 0x07,
    /// Port value captured at interrupt time (read only)
    Intcap = 0x08,
    /// Port value; writes go to OLAT
    Gpio = 0x09,
    /// Output latch
    Olat = 0x0A,
}

impl Register {
    pub const ALL: [Register; 11] = [
        Register::Iodir,
        Register::Ipol,
        Register::Gpinten,
        Register::Defval,
        Register::Intcon,
        Register::Iocon,
        Register::Gppu,
        Register::Intf,
        Register::Intcap,
        Register::Gpio,
        Register::Olat,
    ];

    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub fn from_addr(addr: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|reg| reg.addr() == addr)
    }

    pub const fn is_read_only(self) -> bool {
        matches!(self, Register::Intf | Register::Intcap)
    }
}

/// Register-level access to one MCP23008
pub struct RegisterPort<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> RegisterPort<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn read_register(&mut self, reg: Register) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[reg.addr()], &mut buf)?;
        Ok(buf[0])
    }

    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg.addr(), value])
    }

    /// Read one bit (0 or 1). Bit indexes above 7 read as 0 without
    /// touching the bus.
    pub fn read_bit(&mut self, reg: Register, bit: u8) -> Result<u8, I2C::Error> {
        if bit > bits::MAX_BIT {
            return Ok(0);
        }
        let value = self.read_register(reg)?;
        Ok(bits::bit_read(value, bit))
    }

    /// Read-modify-write one bit. Bit indexes above 7 are ignored.
    pub fn write_bit(&mut self, reg: Register, bit: u8, high: bool) -> Result<(), I2C::Error> {
        if bit > bits::MAX_BIT {
            return Ok(());
        }
        let value = self.read_register(reg)?;
        self.write_register(reg, bits::bit_write(value, bit, high))
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}
