//! Counter Value Object
//!
//! A facility count in `0..=999_999`.

use derive_more::Display;
use thiserror::Error;

/// Largest accepted count
pub const COUNTER_MAX: i64 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Counter value {value} is outside 0..={max}")]
pub struct CounterOutOfRange {
    pub value: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[display("{_0}")]
pub struct CounterValue(i64);

impl CounterValue {
    pub fn new(value: i64) -> Result<Self, CounterOutOfRange> {
        if (0..=COUNTER_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CounterOutOfRange {
                value,
                max: COUNTER_MAX,
            })
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i32> for CounterValue {
    type Error = CounterOutOfRange;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}
