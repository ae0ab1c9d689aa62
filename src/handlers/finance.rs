// src/handlers/finance.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermFinanceView, RequirePermission},
    },
    models::finance::{FinancialPipeline, QuarterBucket, YearQuery},
};

// GET /api/financials
#[utoipa::path(
    get,
    path = "/api/financials",
    tag = "Financials",
    responses(
        (status = 200, description = "Linhas por projeto e totais contábeis", body = FinancialPipeline),
        (status = 403, description = "Sem acesso ao financeiro")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pipeline(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFinanceView>,
) -> Result<impl IntoResponse, ApiError> {
    let pipeline = app_state.finance_service.pipeline().await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::OK, Json(pipeline)))
}

// GET /api/financials/quarterly?year=2024
#[utoipa::path(
    get,
    path = "/api/financials/quarterly",
    tag = "Financials",
    params(("year" = Option<i32>, Query, description = "Ano fiscal (padrão: ano corrente)")),
    responses(
        (status = 200, description = "Recebimentos Q1..Q4", body = Vec<QuarterBucket>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quarterly(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFinanceView>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let buckets = app_state.finance_service.quarterly(year).await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::OK, Json(buckets)))
}
