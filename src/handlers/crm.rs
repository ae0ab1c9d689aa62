// src/handlers/crm.rs

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
        rbac::{PermClientDetailView, PermCrmCreate, PermCrmDelete, PermCrmEdit, PermCrmView, RequirePermission},
    },
    models::crm::{
        AccountStatusPayload, ClientDetail, CreateCustomerPayload, Customer, CustomerListQuery,
        CustomerListResponse, UpdateCustomerPayload,
    },
};

// =============================================================================
//  ÁREA 1: LEITURA
// =============================================================================

// GET /api/crm/customers
#[utoipa::path(
    get,
    path = "/api/crm/customers",
    tag = "CRM",
    params(
        ("q" = Option<String>, Query, description = "Busca por nome ou empresa"),
        ("accountStatus" = Option<String>, Query, description = "PENDING | APPROVED | REJECTED")
    ),
    responses(
        (status = 200, description = "Lista de clientes", body = CustomerListResponse),
        (status = 403, description = "Sem acesso ao CRM")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermCrmView>,
    Query(query): Query<CustomerListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let list = app_state.crm_service.list(&query).await;
    Ok((StatusCode::OK, Json(list)))
}

// GET /api/crm/customers/{id}
#[utoipa::path(
    get,
    path = "/api/crm/customers/{id}",
    tag = "CRM",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Ficha do cliente", body = ClientDetail),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClientDetailView>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .crm_service
        .detail(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// =============================================================================
//  ÁREA 2: ESCRITA
// =============================================================================

// POST /api/crm/customers
#[utoipa::path(
    post,
    path = "/api/crm/customers",
    tag = "CRM",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado (já aprovado)", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermCrmCreate>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .create(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PATCH /api/crm/customers/{id}
#[utoipa::path(
    patch,
    path = "/api/crm/customers/{id}",
    tag = "CRM",
    params(("id" = String, Path, description = "ID do cliente")),
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCrmEdit>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .update(&id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/crm/customers/{id}/account-status
#[utoipa::path(
    put,
    path = "/api/crm/customers/{id}/account-status",
    tag = "CRM",
    params(("id" = String, Path, description = "ID do cliente")),
    request_body = AccountStatusPayload,
    responses(
        (status = 200, description = "Conta aprovada / rejeitada", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_account_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCrmEdit>,
    Path(id): Path<String>,
    Json(payload): Json<AccountStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .set_account_status(&id, payload.account_status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/crm/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/crm/customers/{id}",
    tag = "CRM",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente, projetos e chamados removidos"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermCrmDelete>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete(&user, &id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
