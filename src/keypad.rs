//! Application-facing keypad driver
//!
//! [`Keypad`] owns a scanner, a clock, the debounce state machine and the
//! key buffer. Every read first runs a tick, so calling any of them often
//! enough (every 10ms or so) is all the scanning an application needs.
//! A timer task calling [`Keypad::tick`] works just as well.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::buffer::KeyBuffer;
use crate::clock::Clock;
use crate::config::{KEYPAD_BUFFER_SIZE, NO_KEY, POLL_INTERVAL_MS};
use crate::debounce::Debouncer;
use crate::error::{ReadIntError, TimedOut};
use crate::layout::KeypadConfig;
use crate::scanner::{Mcp23008Scanner, Scan};
use crate::types::{KeyString, ScanState, StopReason, Symbol};

/// Debounced, buffered matrix keypad
pub struct Keypad<S, C> {
    scanner: S,
    clock: C,
    debouncer: Debouncer,
    buffer: KeyBuffer,
}

impl<I2C: I2c, D: DelayNs, C: Clock> Keypad<Mcp23008Scanner<I2C, D>, C> {
    /// Keypad on an MCP23008. Call [`Keypad::begin`] before use.
    pub fn new(i2c: I2C, delay: D, clock: C, config: KeypadConfig) -> Self {
        let debounce_ms = config.debounce_ms();
        Self::with_scanner(Mcp23008Scanner::new(i2c, delay, config), clock, debounce_ms)
    }

    pub fn config(&self) -> &KeypadConfig {
        self.scanner.config()
    }

    /// Bus transactions that failed while scanning
    pub fn bus_faults(&self) -> u32 {
        self.scanner.bus_faults()
    }
}

impl<S: Scan, C: Clock> Keypad<S, C> {
    /// Keypad on any scan source
    pub fn with_scanner(scanner: S, clock: C, debounce_ms: u16) -> Self {
        Self {
            scanner,
            clock,
            debouncer: Debouncer::new(debounce_ms),
            buffer: KeyBuffer::new(),
        }
    }

    /// Configure the hardware and start the debounce timer
    pub fn begin(&mut self) -> Result<(), S::Error> {
        self.scanner.init()?;
        let now = self.clock.now_ms();
        self.debouncer.start(now);
        Ok(())
    }

    /// Scan if the debounce interval has elapsed; returns a key confirmed
    /// by this call, which is also queued in the buffer
    pub fn tick(&mut self) -> Option<Symbol> {
        let now = self.clock.now_ms();
        self.debouncer.tick(now, &mut self.scanner, &mut self.buffer)
    }

    /// Number of keys waiting to be read
    pub fn count(&mut self) -> usize {
        self.tick();
        self.buffer.len()
    }

    /// Next key, left in the buffer
    pub fn peek(&mut self) -> Option<Symbol> {
        self.tick();
        self.buffer.peek()
    }

    /// Next key, removed from the buffer
    pub fn pop(&mut self) -> Option<Symbol> {
        self.tick();
        self.buffer.pop()
    }

    /// Byte-level read: the next key, or [`NO_KEY`] when none is waiting
    pub fn pop_or_no_key(&mut self) -> Symbol {
        self.pop().unwrap_or(NO_KEY)
    }

    /// Discard every key waiting to be read
    pub fn flush(&mut self) {
        self.tick();
        self.buffer.flush();
    }

    /// Non-blocking read for use with `nb::block!`
    pub fn pop_nb(&mut self) -> nb::Result<Symbol, Infallible> {
        self.pop().ok_or(nb::Error::WouldBlock)
    }

    /// Wait up to `timeout_ms` for a key; 0 waits forever
    pub fn pop_blocking(&mut self, timeout_ms: u16) -> Result<Symbol, TimedOut> {
        self.pop_blocking_with(timeout_ms, || {})
    }

    /// Like [`Keypad::pop_blocking`], calling `hook` once per poll so the
    /// platform can service its own duties while we spin
    pub fn pop_blocking_with(&mut self, timeout_ms: u16, mut hook: impl FnMut()) -> Result<Symbol, TimedOut> {
        let start = self.clock.now_ms();
        loop {
            hook();
            if timeout_ms != 0 && self.clock.elapsed_since(start) >= u32::from(timeout_ms) {
                return Err(TimedOut);
            }
            if let Some(symbol) = self.pop() {
                return Ok(symbol);
            }
        }
    }

    /// Async wait for a key; sleeps on `delay` between polls instead of
    /// spinning. 0 waits forever.
    pub async fn pop_async<D>(&mut self, timeout_ms: u16, delay: &mut D) -> Result<Symbol, TimedOut>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let start = self.clock.now_ms();
        loop {
            if timeout_ms != 0 && self.clock.elapsed_since(start) >= u32::from(timeout_ms) {
                return Err(TimedOut);
            }
            if let Some(symbol) = self.pop() {
                return Ok(symbol);
            }
            delay.delay_ms(POLL_INTERVAL_MS).await;
        }
    }

    /// Collect keys until `terminator` is pressed, `max_len` keys have
    /// been read, or no key arrives within `timeout_ms` (0 = no timeout).
    /// The terminator is consumed but not stored.
    pub fn read_keys_until(&mut self, terminator: Symbol, max_len: usize, timeout_ms: u16) -> KeyString {
        self.read_keys_until_with(terminator, max_len, timeout_ms, || {})
    }

    pub fn read_keys_until_with(
        &mut self,
        terminator: Symbol,
        max_len: usize,
        timeout_ms: u16,
        mut hook: impl FnMut(),
    ) -> KeyString {
        let max_len = max_len.min(KEYPAD_BUFFER_SIZE);
        let mut input = KeyString::new();

        while input.len() < max_len {
            match self.pop_blocking_with(timeout_ms, &mut hook) {
                Ok(symbol) if symbol == terminator => {
                    input.stop = StopReason::Terminator;
                    return input;
                }
                Ok(symbol) => {
                    if input.keys.push(symbol).is_err() {
                        break;
                    }
                }
                Err(TimedOut) => {
                    input.stop = StopReason::TimedOut;
                    return input;
                }
            }
        }

        input.stop = StopReason::MaxReached;
        input
    }

    /// Read a decimal number terminated by `terminator`. A leading `*` or
    /// `-` makes it negative.
    pub fn read_int_until(&mut self, terminator: Symbol, max_len: usize, timeout_ms: u16) -> Result<i32, ReadIntError> {
        let input = self.read_keys_until(terminator, max_len, timeout_ms);
        if input.stop == StopReason::TimedOut {
            return Err(ReadIntError::TimedOut);
        }
        parse_int(&input.keys)
    }

    pub fn state(&self) -> ScanState {
        self.debouncer.state()
    }

    /// Keys dropped because the buffer was full
    pub fn overflows(&self) -> u32 {
        self.buffer.overflows()
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut S {
        &mut self.scanner
    }

    /// Tear down and return the scanner (and with it the bus)
    pub fn release(self) -> S {
        self.scanner
    }
}

fn parse_int(keys: &[Symbol]) -> Result<i32, ReadIntError> {
    let (negative, digits) = match keys.split_first() {
        Some((b'*' | b'-', rest)) => (true, rest),
        _ => (false, keys),
    };
    if digits.is_empty() {
        return Err(ReadIntError::Empty);
    }

    let mut value: i32 = 0;
    for &key in digits {
        if !key.is_ascii_digit() {
            return Err(ReadIntError::Invalid);
        }
        let digit = i32::from(key - b'0');
        value = value.checked_mul(10).ok_or(ReadIntError::Invalid)?;
        value = if negative {
            value.checked_sub(digit)
        } else {
            value.checked_add(digit)
        }
        .ok_or(ReadIntError::Invalid)?;
    }
    Ok(value)
}
