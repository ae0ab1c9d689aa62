// src/handlers/portal.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermPortal, RequirePermission},
    },
    models::{
        auth::Principal,
        portal::{MakePaymentPayload, PortalOverview},
        tickets::{CreateTicketPayload, ReplyPayload, Ticket},
    },
};

// O portal só faz sentido para contas de cliente
fn ensure_client(user: &Principal) -> Result<(), AppError> {
    if user.is_client() {
        Ok(())
    } else {
        Err(AppError::Forbidden("CLIENT_PORTAL".to_string()))
    }
}

// GET /api/portal
#[utoipa::path(
    get,
    path = "/api/portal",
    tag = "Client Portal",
    responses(
        (status = 200, description = "Cadastro, projetos, chamados e saldo do cliente", body = PortalOverview),
        (status = 403, description = "Somente clientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermPortal>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_client(&user).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let overview = app_state.portal_service.overview(&user).await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/portal/tickets
#[utoipa::path(
    get,
    path = "/api/portal/tickets",
    tag = "Client Portal",
    responses((status = 200, description = "Chamados do cliente", body = Vec<Ticket>)),
    security(("api_jwt" = []))
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermPortal>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_client(&user).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tickets = app_state.ticket_service.list_for_client(&user).await;
    Ok((StatusCode::OK, Json(tickets)))
}

// POST /api/portal/tickets
#[utoipa::path(
    post,
    path = "/api/portal/tickets",
    tag = "Client Portal",
    request_body = CreateTicketPayload,
    responses(
        (status = 201, description = "Chamado aberto", body = Ticket),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Projeto não pertence ao cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermPortal>,
    Json(payload): Json<CreateTicketPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_client(&user).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let ticket = app_state.ticket_service.create_for_client(&user, payload).await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

// POST /api/portal/tickets/{id}/messages
#[utoipa::path(
    post,
    path = "/api/portal/tickets/{id}/messages",
    tag = "Client Portal",
    params(("id" = String, Path, description = "ID do chamado")),
    request_body = ReplyPayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = Ticket),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reply_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermPortal>,
    Path(id): Path<String>,
    Json(payload): Json<ReplyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_client(&user).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let ticket = app_state.ticket_service.reply_as_client(&user, &id, payload).await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

// POST /api/portal/payments
#[utoipa::path(
    post,
    path = "/api/portal/payments",
    tag = "Client Portal",
    request_body = MakePaymentPayload,
    responses(
        (status = 200, description = "Pagamento registrado, saldo recalculado", body = PortalOverview),
        (status = 400, description = "Valor deve ser positivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn make_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermPortal>,
    Json(payload): Json<MakePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_client(&user).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let overview = app_state.portal_service.make_payment(&user, payload.amount).await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(overview)))
}
