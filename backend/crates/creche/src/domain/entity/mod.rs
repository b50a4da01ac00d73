//! Entity Module

pub mod counters;

pub use counters::Counters;
