// src/models/crm.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::not_blank,
    models::{
        auth::AccountStatus,
        projects::ProjectWithFinancials,
        tickets::Ticket,
    },
};

// --- ENUMS ---

// Estágio comercial do cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum CustomerStatus {
    #[default]
    Lead,
    Prospect,
    Active,
    Churned,
}

// --- CLIENTE ---

// Os campos financeiros (lifetime_value, total_price, paid_amount) NÃO são derivados
// dos projetos: são mantidos à parte, como no cadastro comercial.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(example = "c-1")]
    pub id: String,
    #[schema(example = "Sarah Jenkins")]
    pub name: String,
    #[schema(example = "Acme Inc.")]
    pub company: String,
    #[schema(example = "s.jenkins@acme.inc")]
    pub email: String,
    pub phone: String,
    pub status: CustomerStatus,
    pub account_status: AccountStatus,

    #[schema(example = "12500.00")]
    pub lifetime_value: Decimal,
    #[schema(example = "15000.00")]
    pub total_price: Decimal,
    #[schema(example = "8500.00")]
    pub paid_amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2024-05-10")]
    pub last_contact: NaiveDate,
    pub assigned_to: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: Option<String>,

    pub description: Option<String>,
    pub industry: Option<String>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(custom(function = not_blank))]
    #[schema(example = "Maria Saleh")]
    pub name: String,

    #[validate(custom(function = not_blank))]
    #[schema(example = "Saleh Logistics")]
    pub company: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@saleh.sa")]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub status: CustomerStatus,

    #[serde(default)]
    #[schema(example = "5000.00")]
    pub total_price: Decimal,

    // Opcional: permite acesso ao portal
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: Option<String>,

    pub industry: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(custom(function = not_blank))]
    pub name: Option<String>,
    #[validate(custom(function = not_blank))]
    pub company: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<CustomerStatus>,
    pub account_status: Option<AccountStatus>,
    pub lifetime_value: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub last_contact: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatusPayload {
    pub account_status: AccountStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListQuery {
    pub q: Option<String>,
    pub account_status: Option<AccountStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub items: Vec<Customer>,
    pub pending_approvals: usize,
}

// Ficha completa do cliente (tela de detalhe)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    pub customer: Customer,
    pub projects: Vec<ProjectWithFinancials>,
    pub tickets: Vec<Ticket>,
}
