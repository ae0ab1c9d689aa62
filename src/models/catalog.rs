// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[schema(example = "srv-1")]
    pub id: String,
    #[schema(example = "Infrastructure Audit")]
    pub name: String,
    #[schema(example = "Comprehensive security and network assessment.")]
    pub description: String,
    #[schema(example = "5000.00")]
    pub base_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(custom(function = not_blank))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_price: Decimal,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicePayload {
    #[validate(custom(function = not_blank))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
}
