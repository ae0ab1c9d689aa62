// src/models/dashboard.rs

use serde::Serialize;
use rust_decimal::Decimal;
use utoipa::ToSchema;

use crate::models::{audit::AuditLog, finance::QuarterBucket};

// 1. Os Cards do Topo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub currency: String,
    pub pipeline_value: Decimal,  // Soma dos contratos (sem IVA)
    pub total_vat: Decimal,
    pub total_revenue: Decimal,   // Contratos + IVA
    pub total_collected: Decimal,
    pub realized_percent: Decimal,
    pub open_tickets: usize,      // Nem CLOSED nem RESOLVED
    pub active_projects: usize,
}

// 2. Gráficos
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrendEntry {
    #[schema(example = "Jan")]
    pub month: String,
    pub value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketLoadEntry {
    #[schema(example = "Open")]
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHealthEntry {
    #[schema(example = "Planning")]
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub year: i32,
    pub monthly_trend: Vec<MonthlyTrendEntry>,
    pub ticket_load: Vec<TicketLoadEntry>,
    pub project_health: Vec<ProjectHealthEntry>,
    pub quarterly_collections: Vec<QuarterBucket>,
}

// 3. Atividade recente
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardActivity {
    pub recent_audits: Vec<AuditLog>,
}
