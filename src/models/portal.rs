// src/models/portal.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    crm::Customer,
    finance::ClientBalance,
    projects::ProjectWithFinancials,
    tickets::Ticket,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalOverview {
    pub currency: String,
    pub customer: Customer,
    pub balance: ClientBalance,
    pub projects: Vec<ProjectWithFinancials>,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MakePaymentPayload {
    #[schema(example = "1500.00")]
    pub amount: Decimal,
}
