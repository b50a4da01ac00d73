//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::application::UpdateCounterInput;
use crate::domain::entity::Counters;

/// `GET /api/creches`
#[derive(Debug, Clone, Serialize)]
pub struct CountersResponse {
    #[serde(rename = "entregues")]
    pub existing: i64,
    #[serde(rename = "prometidas")]
    pub promised: i64,
}

impl From<Counters> for CountersResponse {
    fn from(counters: Counters) -> Self {
        Self {
            existing: counters.existing.get(),
            promised: counters.promised.get(),
        }
    }
}

/// `GET /api/creche`, the older shape still read by cached pages
#[derive(Debug, Clone, Serialize)]
pub struct LegacyCountersResponse {
    #[serde(rename = "existentes")]
    pub existing: i64,
    #[serde(rename = "prometidas")]
    pub promised: i64,
}

impl From<Counters> for LegacyCountersResponse {
    fn from(counters: Counters) -> Self {
        Self {
            existing: counters.existing.get(),
            promised: counters.promised.get(),
        }
    }
}

/// `PATCH /api/creches`
///
/// `valor` is kept as a raw JSON number so a fractional value can be told
/// apart from a missing or non-numeric one.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCounterRequest {
    #[serde(rename = "campo")]
    pub field: String,
    #[serde(rename = "valor")]
    pub value: Number,
}

impl From<UpdateCounterRequest> for UpdateCounterInput {
    fn from(req: UpdateCounterRequest) -> Self {
        // Integers above i64 saturate and fail the range check
        let value = req
            .value
            .as_i64()
            .or_else(|| req.value.as_u64().map(|_| i64::MAX));

        Self {
            field: req.field,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCounterResponse {
    #[serde(rename = "sucesso")]
    pub success: bool,
    #[serde(rename = "entregues")]
    pub existing: i64,
    #[serde(rename = "prometidas")]
    pub promised: i64,
}

impl From<Counters> for UpdateCounterResponse {
    fn from(counters: Counters) -> Self {
        Self {
            success: true,
            existing: counters.existing.get(),
            promised: counters.promised.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(body: serde_json::Value) -> UpdateCounterInput {
        serde_json::from_value::<UpdateCounterRequest>(body).unwrap().into()
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(input(json!({ "campo": "entregues", "valor": 12 })).value, Some(12));
        assert_eq!(input(json!({ "campo": "entregues", "valor": -3 })).value, Some(-3));
        assert_eq!(
            input(json!({ "campo": "entregues", "valor": u64::MAX })).value,
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_fractional_value_is_not_an_integer() {
        assert_eq!(input(json!({ "campo": "entregues", "valor": 1.5 })).value, None);
        assert_eq!(input(json!({ "campo": "entregues", "valor": 2.0 })).value, None);
    }

    #[test]
    fn test_rejects_malformed_bodies() {
        for body in [
            json!({ "campo": "entregues", "valor": "5" }),
            json!({ "campo": "entregues" }),
            json!({ "campo": "entregues", "valor": 5, "extra": 1 }),
        ] {
            assert!(serde_json::from_value::<UpdateCounterRequest>(body).is_err());
        }
    }

    #[test]
    fn test_response_wire_names() {
        let counters = Counters::zero();
        assert_eq!(
            serde_json::to_value(CountersResponse::from(counters)).unwrap(),
            json!({ "entregues": 0, "prometidas": 0 })
        );
        assert_eq!(
            serde_json::to_value(LegacyCountersResponse::from(counters)).unwrap(),
            json!({ "existentes": 0, "prometidas": 0 })
        );
    }
}
