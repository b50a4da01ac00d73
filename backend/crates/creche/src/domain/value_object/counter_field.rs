//! Counter Field Value Object
//!
//! Which of the two facility counters an update targets. The wire names
//! are the ones the front-end sends in `campo`.

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown counter field '{0}'")]
pub struct UnknownCounterField(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum CounterField {
    /// Facilities already delivered
    #[display("entregues")]
    Existing,
    /// Facilities promised
    #[display("prometidas")]
    Promised,
}

impl FromStr for CounterField {
    type Err = UnknownCounterField;

    /// Exact match only; no trimming or case folding
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entregues" => Ok(CounterField::Existing),
            "prometidas" => Ok(CounterField::Promised),
            other => Err(UnknownCounterField(other.to_string())),
        }
    }
}
