// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermDashboardView, RequirePermission},
    },
    models::{
        dashboard::{DashboardActivity, DashboardCharts, DashboardSummary},
        finance::YearQuery,
    },
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cards do topo: pipeline, recebido, suporte e operações", body = DashboardSummary),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem acesso ao painel")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermDashboardView>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state.dashboard_service.get_summary().await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/charts?year=
#[utoipa::path(
    get,
    path = "/api/dashboard/charts",
    tag = "Dashboard",
    params(("year" = Option<i32>, Query, description = "Ano (padrão: corrente)")),
    responses(
        (status = 200, description = "Tendência mensal, carga do suporte, saúde dos projetos e trimestres", body = DashboardCharts)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_charts(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermDashboardView>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let charts = app_state.dashboard_service.get_charts(query.year).await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::OK, Json(charts)))
}

// GET /api/dashboard/activity
#[utoipa::path(
    get,
    path = "/api/dashboard/activity",
    tag = "Dashboard",
    responses((status = 200, description = "Últimas auditorias", body = DashboardActivity)),
    security(("api_jwt" = []))
)]
pub async fn get_activity(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermDashboardView>,
) -> Result<impl IntoResponse, ApiError> {
    let activity = app_state.dashboard_service.get_activity().await;
    Ok((StatusCode::OK, Json(activity)))
}
