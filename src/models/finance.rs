// src/models/finance.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::projects::Project;

// Números de um projeto (recalculados a cada requisição a partir do livro de recebimentos)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinancials {
    #[schema(example = "2500.00")]
    pub total_collected: Decimal,
    #[schema(example = "1500.00")]
    pub vat: Decimal,
    #[schema(example = "11500.00")]
    pub total_contract: Decimal,
    #[schema(example = "9000.00")]
    pub outstanding: Decimal,
    #[schema(example = "4000.00")]
    pub profit: Decimal,
    #[schema(example = "40.00")]
    pub margin_percent: Decimal,
}

// Consolidado contábil de todos os projetos
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountingTotals {
    pub deal_value: Decimal,
    pub vat_liability: Decimal,
    pub total_receivables: Decimal,
    pub collected: Decimal,
    pub outstanding: Decimal,
    pub collection_ratio_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRow {
    pub project: Project,
    #[schema(example = "Acme Inc.")]
    pub client_name: String,
    pub financials: ProjectFinancials,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPipeline {
    pub currency: String,
    pub rows: Vec<FinancialRow>,
    pub totals: AccountingTotals,
}

// Recebimentos agrupados por trimestre do ano fiscal
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuarterBucket {
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 1)]
    pub quarter: u32,
    #[schema(example = "Q1")]
    pub label: String,
    pub collected: Decimal,
}

// Resumo financeiro do portal do cliente
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientBalance {
    pub contract_total: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}
