// src/models/projects.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::not_blank,
    models::{
        attachment::{Attachment, AttachmentPayload},
        finance::ProjectFinancials,
    },
};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    OnHold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Upfront,
    Progress,
    Final,
    Variation,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTask {
    pub id: String,
    #[schema(example = "Levantamento de rede")]
    pub title: String,
    pub status: TaskStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

// Lançamento do livro de recebimentos (só cresce)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayment {
    pub id: String,
    #[schema(example = "2500.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-06-01")]
    pub date: NaiveDate,
    #[schema(example = "Progress collection")]
    pub note: String,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    pub invoice_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedCollection {
    pub id: String,
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub expected_date: NaiveDate,
    pub note: String,
}

// Percentuais de faturamento por marco
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentRates {
    pub first: Decimal,
    pub second: Decimal,
    pub third: Decimal,
    #[serde(rename = "final")]
    pub final_rate: Decimal,
}

impl Default for PaymentRates {
    fn default() -> Self {
        let quarter = Decimal::from(25);
        Self { first: quarter, second: quarter, third: quarter, final_rate: quarter }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[schema(example = "PRJ-1001")]
    pub id: String,
    #[schema(example = "Data Center Hardening")]
    pub name: String,
    pub description: String,
    pub client_id: String,
    pub admin_ids: Vec<String>,

    #[schema(example = "10000.00")]
    pub value: Decimal,
    #[schema(example = "6000.00")]
    pub costs: Decimal,
    pub award_ref: String,
    pub invoice_ref: String,
    #[schema(example = "0.15")]
    pub tax_rate: Decimal,
    pub payment_rates: PaymentRates,
    pub payments: Vec<ProjectPayment>,
    pub expected_collections: Vec<ExpectedCollection>,
    pub guarantees: String,
    pub financial_notes: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub tasks: Vec<ProjectTask>,
    pub attachments: Vec<Attachment>,
    pub service_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithFinancials {
    #[serde(flatten)]
    pub project: Project,
    pub financials: ProjectFinancials,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(custom(function = not_blank))]
    #[schema(example = "Data Center Hardening")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(custom(function = not_blank))]
    #[schema(example = "c-1")]
    pub client_id: String,

    #[serde(default)]
    pub admin_ids: Vec<String>,

    #[serde(default)]
    #[schema(example = "10000.00")]
    pub value: Decimal,
    #[serde(default)]
    pub costs: Decimal,
    #[serde(default)]
    pub award_ref: String,
    #[serde(default)]
    pub invoice_ref: String,
    #[serde(default)]
    pub status: ProjectStatus,

    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    // Títulos das tarefas iniciais
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub service_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectPayload {
    #[validate(custom(function = not_blank))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub admin_ids: Option<Vec<String>>,
    pub value: Option<Decimal>,
    pub costs: Option<Decimal>,
    pub award_ref: Option<String>,
    pub invoice_ref: Option<String>,
    pub payment_rates: Option<PaymentRates>,
    pub guarantees: Option<String>,
    pub financial_notes: Option<String>,
    pub status: Option<ProjectStatus>,
    // Ausente = mantém; `null` = limpa a data
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
    pub service_ids: Option<Vec<String>>,
}

// Distingue campo ausente (None) de `null` explícito (Some(None))
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentPayload {
    #[schema(example = "2500.00")]
    pub amount: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    pub invoice_ref: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddExpectedCollectionPayload {
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub expected_date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskPayload {
    #[schema(example = "Instalar firewall")]
    pub title: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub status: TaskStatus,
}

pub type AddAttachmentPayload = AttachmentPayload;
