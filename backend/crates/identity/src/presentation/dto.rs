//! API DTOs (Data Transfer Objects)
//!
//! Wire names follow the front-end (Portuguese); field names stay English.
//! Requests reject unknown fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::IdentitySummary;

// ============================================================================
// Identify (login-or-register)
// ============================================================================

/// Identify request. No `Debug`: it carries personal data.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentifyRequest {
    #[serde(rename = "cpf")]
    pub national_id: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
}

/// Identify response
#[derive(Debug, Clone, Serialize)]
pub struct IdentifyResponse {
    #[serde(rename = "sucesso")]
    pub success: bool,
    pub admin: bool,
}

// ============================================================================
// Session
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusResponse {
    #[serde(rename = "logado")]
    pub logged_in: bool,
    pub admin: bool,
}

// ============================================================================
// Name completion
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NameStatusResponse {
    #[serde(rename = "nome_pendente")]
    pub name_pending: bool,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompleteNameRequest {
    #[serde(rename = "nome")]
    pub name: String,
}

/// Generic `{sucesso: true}` body
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    #[serde(rename = "sucesso")]
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ============================================================================
// Admin
// ============================================================================

/// One row of the admin listing. Fields are `null` when unreadable.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityListItem {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cpf")]
    pub national_id: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub admin: bool,
    #[serde(rename = "legivel")]
    pub readable: bool,
}

impl From<IdentitySummary> for IdentityListItem {
    fn from(summary: IdentitySummary) -> Self {
        Self {
            id: summary.id.into_uuid(),
            name: summary.name,
            national_id: summary.national_id,
            phone: summary.phone,
            admin: summary.is_admin,
            readable: summary.readable,
        }
    }
}

/// Role change request; `admin` must be a JSON boolean
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeRoleRequest {
    pub admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeRoleResponse {
    #[serde(rename = "sucesso")]
    pub success: bool,
    pub admin: bool,
}
