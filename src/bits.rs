//! Bit manipulation helpers for 8-bit expander registers
//!
//! Bit indexes outside 0..=7 never touch the value: reads return 0 and
//! writes leave the byte unchanged.

/// Highest valid bit index in an 8-bit register
pub const MAX_BIT: u8 = 7;

/// Read one bit, returning 0 or 1
#[inline]
pub const fn bit_read(value: u8, bit: u8) -> u8 {
    if bit > MAX_BIT {
        return 0;
    }
    (value >> bit) & 0x01
}

#[inline]
pub const fn bit_set(value: u8, bit: u8) -> u8 {
    if bit > MAX_BIT {
        return value;
    }
    value | (1 << bit)
}

#[inline]
pub const fn bit_clear(value: u8, bit: u8) -> u8 {
    if bit > MAX_BIT {
        return value;
    }
    value & !(1 << bit)
}

/// Set or clear one bit depending on `high`
#[inline]
pub const fn bit_write(value: u8, bit: u8, high: bool) -> u8 {
    if high {
        bit_set(value, bit)
    } else {
        bit_clear(value, bit)
    }
}

/// Build a mask with one bit set per line in `lines`
pub fn mask_of(lines: &[u8]) -> u8 {
    lines.iter().fold(0, |mask, &line| bit_set(mask, line))
}

/// True when every bit selected by `mask` reads high in `port`
#[inline]
pub const fn all_high(port: u8, mask: u8) -> bool {
    (port & mask) ^ mask == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_set_clear() {
        assert_eq!(bit_read(0b0000_0100, 2), 1);
        assert_eq!(bit_read(0b0000_0100, 3), 0);
        assert_eq!(bit_set(0, 7), 0x80);
        assert_eq!(bit_clear(0xFF, 0), 0xFE);
        assert_eq!(bit_write(0x00, 4, true), 0x10);
        assert_eq!(bit_write(0xFF, 4, false), 0xEF);
    }

    #[test]
    fn out_of_range_bits_are_ignored() {
        assert_eq!(bit_read(0xFF, 8), 0);
        assert_eq!(bit_set(0x12, 9), 0x12);
        assert_eq!(bit_clear(0x12, 200), 0x12);
        assert_eq!(bit_write(0x12, 8, true), 0x12);
    }

    #[test]
    fn mask_from_lines() {
        assert_eq!(mask_of(&[0, 1, 2, 3]), 0x0F);
        assert_eq!(mask_of(&[4, 5, 6, 7]), 0xF0);
        assert_eq!(mask_of(&[]), 0x00);
        // Duplicates collapse
        assert_eq!(mask_of(&[1, 1]), 0x02);
    }

    #[test]
    fn all_high_checks_only_masked_bits() {
        assert!(all_high(0xFF, 0x0F));
        assert!(all_high(0x0F, 0x0F));
        assert!(!all_high(0x0B, 0x0F));
        assert!(all_high(0x00, 0x00));
    }
}
