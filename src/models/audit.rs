// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// Registro de auditoria: quem, quando, antes e depois
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    #[schema(example = "Securelogx Admin")]
    pub user_name: String,
    #[schema(example = "admin@securelogx.com")]
    pub user_email: String,
    pub action_datetime: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub before_change: Option<Value>,
    #[schema(value_type = Object)]
    pub after_change: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditSearchQuery {
    pub q: Option<String>,
}
