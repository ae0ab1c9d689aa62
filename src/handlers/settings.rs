// src/handlers/settings.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermSettingsView, RequirePermission},
    },
    models::settings::{PublicManifest, SystemManifest},
};

// GET /api/manifest/public
#[utoipa::path(
    get,
    path = "/api/manifest/public",
    tag = "Settings",
    responses((status = 200, description = "Marca e textos da tela de login", body = PublicManifest))
)]
pub async fn get_public_manifest(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.settings_service.public_manifest().await)
}

// GET /api/settings/manifest
#[utoipa::path(
    get,
    path = "/api/settings/manifest",
    tag = "Settings",
    responses((status = 200, description = "Manifesto completo (senhas omitidas)", body = SystemManifest)),
    security(("api_jwt" = []))
)]
pub async fn get_manifest(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSettingsView>,
) -> Result<impl IntoResponse, ApiError> {
    Ok((StatusCode::OK, Json(app_state.settings_service.get().await)))
}

// PUT /api/settings/manifest
#[utoipa::path(
    put,
    path = "/api/settings/manifest",
    tag = "Settings",
    request_body = SystemManifest,
    responses(
        (status = 200, description = "Manifesto substituído", body = SystemManifest),
        (status = 403, description = "Somente administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_manifest(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SystemManifest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .settings_service
        .replace(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}
