//! Press/confirm/release state machine
//!
//! A key is accepted only when the same symbol is reported by two scans
//! taken one debounce interval apart. After that, or after any conflict,
//! nothing new is accepted until a scan finds every key up.

use crate::buffer::KeyBuffer;
use crate::scanner::Scan;
use crate::types::{KeyResult, ScanState, Symbol};

pub struct Debouncer {
    state: ScanState,
    candidate: Option<Symbol>,
    interval_ms: u16,
    last_tick: u32,
}

impl Debouncer {
    pub const fn new(interval_ms: u16) -> Self {
        Self {
            state: ScanState::AwaitingPress,
            candidate: None,
            interval_ms,
            last_tick: 0,
        }
    }

    /// Reset to idle and take `now_ms` as the reference for the next tick
    pub fn start(&mut self, now_ms: u32) {
        self.state = ScanState::AwaitingPress;
        self.candidate = None;
        self.last_tick = now_ms;
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Symbol waiting for confirmation, while in `AwaitingDebounce`
    pub fn candidate(&self) -> Option<Symbol> {
        self.candidate
    }

    pub fn interval_ms(&self) -> u16 {
        self.interval_ms
    }

    /// True when a tick at `now_ms` would scan
    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_tick) >= u32::from(self.interval_ms)
    }

    /// Advance the state machine if a full interval has passed.
    ///
    /// Returns the symbol confirmed by this tick. A confirmed symbol that
    /// does not fit in the buffer is dropped (and counted by the buffer),
    /// but the key still has to be released before the next press.
    pub fn tick<S: Scan + ?Sized>(&mut self, now_ms: u32, scanner: &mut S, buffer: &mut KeyBuffer) -> Option<Symbol> {
        if !self.is_due(now_ms) {
            return None;
        }
        self.last_tick = now_ms;

        let result = scanner.scan_once();
        let mut confirmed = None;

        let next = match (self.state, result) {
            (ScanState::AwaitingPress, KeyResult::Key(symbol)) => {
                self.candidate = Some(symbol);
                ScanState::AwaitingDebounce
            }
            (ScanState::AwaitingPress, KeyResult::Conflict) => ScanState::AwaitingRelease,
            (ScanState::AwaitingPress, KeyResult::NoKey) => ScanState::AwaitingPress,

            (ScanState::AwaitingDebounce, KeyResult::Key(symbol)) if self.candidate == Some(symbol) => {
                self.candidate = None;
                confirmed = Some(symbol);
                if buffer.push(symbol).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("keypad: buffer full, dropped key {}", symbol as char);
                }
                ScanState::AwaitingRelease
            }
            (ScanState::AwaitingDebounce, KeyResult::Key(symbol)) => {
                // A different key: restart the confirmation with it
                self.candidate = Some(symbol);
                ScanState::AwaitingDebounce
            }
            (ScanState::AwaitingDebounce, KeyResult::Conflict) => {
                self.candidate = None;
                ScanState::AwaitingRelease
            }
            (ScanState::AwaitingDebounce, KeyResult::NoKey) => {
                self.candidate = None;
                ScanState::AwaitingPress
            }

            (ScanState::AwaitingRelease, KeyResult::NoKey) => ScanState::AwaitingPress,
            (ScanState::AwaitingRelease, _) => ScanState::AwaitingRelease,
        };

        #[cfg(feature = "defmt")]
        {
            if next != self.state {
                defmt::trace!("keypad: {:?} -> {:?} on {:?}", self.state, next, result);
            }
            if let Some(symbol) = confirmed {
                defmt::debug!("keypad: key {} pressed", symbol as char);
            }
        }

        self.state = next;
        confirmed
    }
}
