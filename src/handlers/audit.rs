// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::rbac::{PermAuditView, RequirePermission},
    models::audit::{AuditLog, AuditSearchQuery},
};

// GET /api/audit?q=
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Audit",
    params(("q" = Option<String>, Query, description = "Nome ou e-mail de quem agiu")),
    responses((status = 200, description = "Registros de auditoria, mais recente primeiro", body = Vec<AuditLog>)),
    security(("api_jwt" = []))
)]
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAuditView>,
    Query(query): Query<AuditSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = app_state.audit_service.search(query.q.as_deref()).await;
    Ok((StatusCode::OK, Json(logs)))
}
