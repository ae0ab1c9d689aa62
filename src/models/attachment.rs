// src/models/attachment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::not_blank;

// Só metadados: o arquivo em si não é armazenado pelo backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[schema(example = "contrato.pdf")]
    pub name: String,
    #[schema(example = "https://files.securelogx.com/contrato.pdf")]
    pub url: String,
    #[serde(rename = "type")]
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size: Option<u64>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    #[validate(custom(function = not_blank))]
    pub name: String,
    #[validate(custom(function = not_blank))]
    pub url: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
    pub size: Option<u64>,
}

impl AttachmentPayload {
    pub fn into_attachment(self, now: DateTime<Utc>) -> Attachment {
        Attachment {
            name: self.name,
            url: self.url,
            content_type: self.content_type,
            size: self.size,
            uploaded_at: Some(now),
        }
    }
}
