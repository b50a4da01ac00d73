//! Counters Entity
//!
//! The single row of facility totals shown on the public page.

use crate::domain::value_object::{CounterField, CounterValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub existing: CounterValue,
    pub promised: CounterValue,
}

impl Counters {
    /// Row created at startup when none exists
    pub fn zero() -> Self {
        Self::default()
    }

    /// Copy with one field replaced
    pub fn with(mut self, field: CounterField, value: CounterValue) -> Self {
        match field {
            CounterField::Existing => self.existing = value,
            CounterField::Promised => self.promised = value,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_replaces_only_one_field() {
        let seven = CounterValue::new(7).unwrap();
        let counters = Counters::zero().with(CounterField::Promised, seven);
        assert_eq!(counters.promised, seven);
        assert_eq!(counters.existing, CounterValue::default());
    }
}
