// src/handlers/projects.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PermProjectsCreate, PermProjectsEdit, PermProjectsView, RequirePermission},
    },
    models::{
        finance::ProjectFinancials,
        projects::{
            AddAttachmentPayload, AddExpectedCollectionPayload, AddPaymentPayload, AddTaskPayload,
            CreateProjectPayload, ProjectTask, ProjectWithFinancials, UpdateProjectPayload,
            UpdateTaskPayload,
        },
    },
};

// =============================================================================
//  ÁREA 1: PIPELINE DE PROJETOS
// =============================================================================

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projetos liberados para o usuário", body = Vec<ProjectWithFinancials>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsView>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .project_service
        .list(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok((StatusCode::OK, Json(projects)))
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, description = "Projeto criado", body = ProjectWithFinancials),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsCreate>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .create(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// GET /api/projects/{id}
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto (PRJ-n)")),
    responses(
        (status = 200, description = "Projeto com números financeiros", body = ProjectWithFinancials),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsView>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .get(&user, &id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(project)))
}

// PATCH /api/projects/{id}
#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto")),
    request_body = UpdateProjectPayload,
    responses(
        (status = 200, description = "Projeto atualizado", body = ProjectWithFinancials),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .update(&user, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(project)))
}

// GET /api/projects/{id}/financials
#[utoipa::path(
    get,
    path = "/api/projects/{id}/financials",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "IVA, contrato, recebido, em aberto e margem", body = ProjectFinancials)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_project_financials(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsView>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let financials = app_state
        .project_service
        .financials(&user, &id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(financials)))
}

// =============================================================================
//  ÁREA 2: RECEBIMENTOS
// =============================================================================

// POST /api/projects/{id}/payments
#[utoipa::path(
    post,
    path = "/api/projects/{id}/payments",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto")),
    request_body = AddPaymentPayload,
    responses(
        (status = 201, description = "Recebimento lançado", body = ProjectWithFinancials),
        (status = 400, description = "Valor deve ser positivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<AddPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .add_payment(&user, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// POST /api/projects/{id}/expected-collections
#[utoipa::path(
    post,
    path = "/api/projects/{id}/expected-collections",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto")),
    request_body = AddExpectedCollectionPayload,
    responses(
        (status = 201, description = "Previsão de recebimento registrada", body = ProjectWithFinancials)
    ),
    security(("api_jwt" = []))
)]
pub async fn add_expected_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<AddExpectedCollectionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .add_expected_collection(&user, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// =============================================================================
//  ÁREA 3: TAREFAS E ANEXOS
// =============================================================================

// POST /api/projects/{id}/tasks
#[utoipa::path(
    post,
    path = "/api/projects/{id}/tasks",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto")),
    request_body = AddTaskPayload,
    responses(
        (status = 201, description = "Tarefa criada", body = ProjectTask)
    ),
    security(("api_jwt" = []))
)]
pub async fn add_task(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<AddTaskPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let task = app_state
        .project_service
        .add_task(&user, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(task)))
}

// PATCH /api/projects/{id}/tasks/{task_id}
#[utoipa::path(
    patch,
    path = "/api/projects/{id}/tasks/{task_id}",
    tag = "Projects",
    params(
        ("id" = String, Path, description = "ID do projeto"),
        ("task_id" = String, Path, description = "ID da tarefa")
    ),
    request_body = UpdateTaskPayload,
    responses(
        (status = 200, description = "Status da tarefa alterado", body = ProjectTask),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_task(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path((id, task_id)): Path<(String, String)>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let task = app_state
        .project_service
        .update_task(&user, &id, &task_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(task)))
}

// DELETE /api/projects/{id}/tasks/{task_id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/tasks/{task_id}",
    tag = "Projects",
    params(
        ("id" = String, Path, description = "ID do projeto"),
        ("task_id" = String, Path, description = "ID da tarefa")
    ),
    responses(
        (status = 204, description = "Tarefa removida"),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path((id, task_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .project_service
        .delete_task(&user, &id, &task_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/projects/{id}/attachments
#[utoipa::path(
    post,
    path = "/api/projects/{id}/attachments",
    tag = "Projects",
    params(("id" = String, Path, description = "ID do projeto")),
    request_body = AddAttachmentPayload,
    responses(
        (status = 201, description = "Anexo registrado", body = ProjectWithFinancials)
    ),
    security(("api_jwt" = []))
)]
pub async fn add_attachment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermProjectsEdit>,
    Path(id): Path<String>,
    Json(payload): Json<AddAttachmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .add_attachment(&user, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}
