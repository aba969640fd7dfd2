//! Host-side doubles for the bus, the clock, the delay and the scanner

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};

use crate::clock::Clock;
use crate::register::Register;
use crate::scanner::Scan;
use crate::types::KeyResult;

/// One register access seen by the simulated expander
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Write(Register, u8),
    Read(Register),
}

struct ExpanderState {
    regs: [u8; 11],
    pointer: u8,
    /// Closed switches as (row line, column line)
    pressed: Vec<(u8, u8)>,
    log: Vec<BusOp>,
    /// (IODIR, OLAT) after every register write
    port_history: Vec<(u8, u8)>,
    fail_skip: usize,
    fail_next: usize,
}

impl ExpanderState {
    fn line_output(&self, line: u8) -> Option<bool> {
        if self.regs[Register::Iodir as usize] & (1 << line) == 0 {
            Some(self.regs[Register::Olat as usize] & (1 << line) != 0)
        } else {
            None
        }
    }

    /// Lines electrically joined to `line` through closed switches
    fn net_of(&self, line: u8) -> u8 {
        let mut net = 1u8 << line;
        loop {
            let before = net;
            for &(row, col) in &self.pressed {
                if net & ((1 << row) | (1 << col)) != 0 {
                    net |= (1 << row) | (1 << col);
                }
            }
            if net == before {
                return net;
            }
        }
    }

    fn gpio(&self) -> u8 {
        let mut value = 0u8;
        for line in 0..8u8 {
            let level = match self.line_output(line) {
                Some(level) => level,
                None => {
                    let net = self.net_of(line);
                    let driven_low = (0..8u8)
                        .filter(|l| net & (1 << l) != 0)
                        .any(|l| self.line_output(l) == Some(false));
                    let level = !driven_low;
                    level ^ (self.regs[Register::Ipol as usize] & (1 << line) != 0)
                }
            };
            if level {
                value |= 1 << line;
            }
        }
        value
    }

    fn read(&mut self) -> u8 {
        let reg = Register::from_addr(self.pointer).expect("pointer outside register map");
        self.log.push(BusOp::Read(reg));
        match reg {
            Register::Gpio => self.gpio(),
            Register::Intf | Register::Intcap => 0,
            _ => self.regs[reg as usize],
        }
    }

    fn write(&mut self, value: u8) {
        let reg = Register::from_addr(self.pointer).expect("pointer outside register map");
        self.log.push(BusOp::Write(reg, value));
        match reg {
            Register::Gpio | Register::Olat => self.regs[Register::Olat as usize] = value,
            Register::Intf | Register::Intcap => {}
            _ => self.regs[reg as usize] = value,
        }
        let port = (self.regs[Register::Iodir as usize], self.regs[Register::Olat as usize]);
        self.port_history.push(port);
    }
}

/// Simulated MCP23008 with a switch matrix wired to its lines.
///
/// Clones share the same chip so a test can keep a handle after moving
/// the bus into the driver.
#[derive(Clone)]
pub struct FakeExpander {
    address: u8,
    state: Rc<RefCell<ExpanderState>>,
}

impl FakeExpander {
    pub fn new(address: u8) -> Self {
        let mut regs = [0u8; 11];
        regs[Register::Iodir as usize] = 0xFF;
        Self {
            address,
            state: Rc::new(RefCell::new(ExpanderState {
                regs,
                pointer: 0,
                pressed: Vec::new(),
                log: Vec::new(),
                port_history: Vec::new(),
                fail_skip: 0,
                fail_next: 0,
            })),
        }
    }

    /// Close the switch joining `row_line` and `col_line`
    pub fn press(&self, row_line: u8, col_line: u8) {
        let mut state = self.state.borrow_mut();
        if !state.pressed.contains(&(row_line, col_line)) {
            state.pressed.push((row_line, col_line));
        }
    }

    pub fn release(&self, row_line: u8, col_line: u8) {
        self.state.borrow_mut().pressed.retain(|&k| k != (row_line, col_line));
    }

    pub fn release_all(&self) {
        self.state.borrow_mut().pressed.clear();
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.state.borrow().regs[reg as usize]
    }

    pub fn log(&self) -> Vec<BusOp> {
        self.state.borrow().log.clone()
    }

    /// (IODIR, OLAT) as left by each register write since the last `clear_log`
    pub fn port_history(&self) -> Vec<(u8, u8)> {
        self.state.borrow().port_history.clone()
    }

    pub fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.log.clear();
        state.port_history.clear();
    }

    /// Make the next `count` transactions fail with a bus error
    pub fn fail_next(&mut self, count: usize) {
        self.fail_after(0, count);
    }

    /// Let `skip` transactions through, then fail the next `count`
    pub fn fail_after(&mut self, skip: usize, count: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_skip = skip;
        state.fail_next = count;
    }
}

impl i2c::ErrorType for FakeExpander {
    type Error = ErrorKind;
}

impl i2c::I2c for FakeExpander {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let mut state = self.state.borrow_mut();
        if state.fail_skip > 0 {
            state.fail_skip -= 1;
        } else if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(ErrorKind::Bus);
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&pointer, data)) = bytes.split_first() {
                        state.pointer = pointer;
                        for &value in data {
                            state.write(value);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = state.read();
                    }
                }
            }
        }
        Ok(())
    }
}

/// Millisecond clock under test control. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
    step: u32,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            step: 0,
        }
    }

    /// Clock that moves forward by `step` ms every time it is read
    pub fn auto(start: u32, step: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            step,
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn get(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

/// Delay that returns immediately
#[derive(Clone, Copy, Default)]
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Async delay that advances a `ManualClock` instead of waiting
pub struct ClockDelay {
    clock: ManualClock,
    pending_ns: u64,
    pub calls: usize,
}

impl ClockDelay {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            pending_ns: 0,
            calls: 0,
        }
    }
}

impl embedded_hal_async::delay::DelayNs for ClockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.pending_ns += u64::from(ns);
        self.clock.advance((self.pending_ns / 1_000_000) as u32);
        self.pending_ns %= 1_000_000;
    }
}

/// Scan source replaying a fixed sequence, then reporting `NoKey`
#[derive(Default)]
pub struct ScriptedScan {
    script: VecDeque<KeyResult>,
    pub scans: usize,
    pub inits: usize,
}

impl ScriptedScan {
    pub fn new(script: &[KeyResult]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            scans: 0,
            inits: 0,
        }
    }
}

impl Scan for ScriptedScan {
    type Error = core::convert::Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.inits += 1;
        Ok(())
    }

    fn scan_once(&mut self) -> KeyResult {
        self.scans += 1;
        self.script.pop_front().unwrap_or(KeyResult::NoKey)
    }
}
