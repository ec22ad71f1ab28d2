//! Circular index counter: an integer that always lives in `[0, max)`.

use super::error::DialError;

/// Euclidean wrap of `value` into `[0, max)`.  `max` must be non-zero.
pub fn wrap(value: i64, max: usize) -> usize {
    value.rem_euclid(max as i64) as usize
}

/// Integer counter normalised into `[0, max)` on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollerCounter {
    value: usize,
    max: usize,
}

impl RollerCounter {
    pub fn new(max: usize) -> Result<Self, DialError> {
        if max == 0 {
            return Err(DialError::EmptyRange);
        }
        Ok(Self { value: 0, max })
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Store any integer; negative and out-of-range values wrap around.
    pub fn set(&mut self, value: i64) {
        self.value = wrap(value, self.max);
    }

    /// `value + offset`, wrapped, without touching the counter.
    pub fn value_with_offset(&self, offset: i64) -> usize {
        wrap(self.value as i64 + offset, self.max)
    }

    pub fn advance(&mut self, by: i64) {
        self.set(self.value as i64 + by);
    }
}
