//! Value Object Module

pub mod counter_field;
pub mod counter_value;

pub use counter_field::{CounterField, UnknownCounterField};
pub use counter_value::{COUNTER_MAX, CounterOutOfRange, CounterValue};
