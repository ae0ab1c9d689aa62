// src/handlers/tickets.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{PermTicketsEdit, PermTicketsView, RequirePermission},
    },
    models::tickets::{ReplyPayload, Ticket, TicketSearchQuery, UpdateTicketStatusPayload},
};

// GET /api/tickets?q=
#[utoipa::path(
    get,
    path = "/api/tickets",
    tag = "Tickets",
    params(("q" = Option<String>, Query, description = "Assunto, cliente, empresa ou número")),
    responses(
        (status = 200, description = "Fila do suporte", body = Vec<Ticket>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermTicketsView>,
    Query(query): Query<TicketSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = app_state.ticket_service.search(query.q.as_deref()).await;
    Ok((StatusCode::OK, Json(tickets)))
}

// GET /api/tickets/{id}
#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    tag = "Tickets",
    params(("id" = String, Path, description = "ID do chamado (TKT-n)")),
    responses(
        (status = 200, description = "Chamado com a conversa", body = Ticket),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermTicketsView>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = app_state
        .ticket_service
        .get(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ticket)))
}

// PUT /api/tickets/{id}/status
#[utoipa::path(
    put,
    path = "/api/tickets/{id}/status",
    tag = "Tickets",
    params(("id" = String, Path, description = "ID do chamado")),
    request_body = UpdateTicketStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Ticket)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermTicketsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTicketStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = app_state
        .ticket_service
        .set_status(&id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ticket)))
}

// POST /api/tickets/{id}/messages
#[utoipa::path(
    post,
    path = "/api/tickets/{id}/messages",
    tag = "Tickets",
    params(("id" = String, Path, description = "ID do chamado")),
    request_body = ReplyPayload,
    responses(
        (status = 201, description = "Resposta da equipe adicionada", body = Ticket),
        (status = 400, description = "Mensagem vazia")
    ),
    security(("api_jwt" = []))
)]
pub async fn reply(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermTicketsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<ReplyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = app_state
        .ticket_service
        .reply_as_staff(&user, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}
