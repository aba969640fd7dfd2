//! Ring buffer of confirmed key presses
//!
//! `head` is the next slot to write, `tail` the next slot to read, and the
//! buffer is empty when they are equal. One slot always stays unused so a
//! full buffer never looks empty: it holds at most `KEYPAD_BUFFER_SIZE - 1`
//! keys, and a key arriving while full is dropped and counted.

use crate::config::KEYPAD_BUFFER_SIZE;
use crate::types::Symbol;

pub struct KeyBuffer {
    slots: [Symbol; KEYPAD_BUFFER_SIZE],
    head: usize,
    tail: usize,
    overflows: u32,
}

impl KeyBuffer {
    pub const fn new() -> Self {
        Self {
            slots: [0; KEYPAD_BUFFER_SIZE],
            head: 0,
            tail: 0,
            overflows: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        KEYPAD_BUFFER_SIZE
    }

    /// Number of unread keys
    pub fn len(&self) -> usize {
        (KEYPAD_BUFFER_SIZE + self.head - self.tail) % KEYPAD_BUFFER_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        Self::advance(self.head) == self.tail
    }

    /// Append a key; when full the key is handed back and counted as lost
    pub fn push(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        if self.is_full() {
            self.overflows = self.overflows.wrapping_add(1);
            return Err(symbol);
        }
        self.slots[self.head] = symbol;
        self.head = Self::advance(self.head);
        Ok(())
    }

    /// Oldest unread key, left in place
    pub fn peek(&self) -> Option<Symbol> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[self.tail])
        }
    }

    pub fn pop(&mut self) -> Option<Symbol> {
        let symbol = self.peek()?;
        self.tail = Self::advance(self.tail);
        Some(symbol)
    }

    /// Drop every unread key
    pub fn flush(&mut self) {
        self.tail = self.head;
    }

    /// Keys lost because the buffer was full
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Unread keys, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.len()).map(move |i| self.slots[(self.tail + i) % KEYPAD_BUFFER_SIZE])
    }

    fn advance(index: usize) -> usize {
        (index + 1) % KEYPAD_BUFFER_SIZE
    }
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new()
    }
}
