pub(crate) const NUL: u8 = 0;
pub(crate) const CR: u8 = 13;
pub(crate) const LF: u8 = 10;
pub(crate) const SP: u8 = 32;
pub(crate) const ZERO: u8 = 48;

/// Decimal rendering of an integer without going through `core::fmt`, right aligned in a
/// fixed buffer.
pub(crate) struct AsciiInt {
    digits: [u8; 20],
    start: usize,
}

impl AsciiInt {
    pub(crate) fn as_str(&self) -> &str {
        // only ever holds ascii digits
        core::str::from_utf8(&self.digits[self.start..]).unwrap_or_default()
    }
}

impl From<u64> for AsciiInt {
    fn from(value: u64) -> Self {
        let mut digits = [SP; 20];
        let mut start = digits.len();
        let mut int = value;

        loop {
            start -= 1;
            digits[start] = (int % 10) as u8 + ZERO;
            int /= 10;
            if int == 0 {
                break;
            }
        }

        AsciiInt { digits, start }
    }
}

impl From<u16> for AsciiInt {
    fn from(value: u16) -> Self {
        Self::from(value as u64)
    }
}

impl From<usize> for AsciiInt {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}
