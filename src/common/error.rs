// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta aguardando aprovação")]
    AccountPendingApproval,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado: {0}")]
    CustomerNotFound(String),

    #[error("Projeto não encontrado: {0}")]
    ProjectNotFound(String),

    #[error("Tarefa não encontrada: {0}")]
    TaskNotFound(String),

    #[error("Chamado não encontrado: {0}")]
    TicketNotFound(String),

    #[error("Serviço não encontrado: {0}")]
    ServiceNotFound(String),

    #[error("Sem permissão: {0}")]
    Forbidden(String),

    #[error("O administrador raiz não pode ser removido")]
    RootAdminProtected,

    #[error("Valor deve ser positivo")]
    InvalidAmount,

    #[error("Valor fora da faixa suportada")]
    AmountOutOfRange,

    #[error("Mensagem vazia")]
    EmptyMessage,

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Status HTTP e chave de tradução
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_already_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::AccountPendingApproval => (StatusCode::FORBIDDEN, "account_pending_approval"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::CustomerNotFound(_) => (StatusCode::NOT_FOUND, "customer_not_found"),
            AppError::ProjectNotFound(_) => (StatusCode::NOT_FOUND, "project_not_found"),
            AppError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "task_not_found"),
            AppError::TicketNotFound(_) => (StatusCode::NOT_FOUND, "ticket_not_found"),
            AppError::ServiceNotFound(_) => (StatusCode::NOT_FOUND, "service_not_found"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::RootAdminProtected => (StatusCode::FORBIDDEN, "root_admin_protected"),
            AppError::InvalidAmount => (StatusCode::BAD_REQUEST, "invalid_amount"),
            AppError::AmountOutOfRange => (StatusCode::BAD_REQUEST, "amount_out_of_range"),
            AppError::EmptyMessage => (StatusCode::BAD_REQUEST, "empty_message"),
            // Todos os outros erros viram 500.
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converte para a resposta HTTP traduzida no idioma do cliente
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            // Retorna todos os detalhes da validação: campo -> códigos
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), codes);
                }
                Some(json!(details))
            }
            AppError::CustomerNotFound(id)
            | AppError::ProjectNotFound(id)
            | AppError::TaskNotFound(id)
            | AppError::TicketNotFound(id)
            | AppError::ServiceNotFound(id) => Some(json!({ "id": id })),
            AppError::Forbidden(required) => Some(json!({ "required": required })),
            _ => None,
        };

        ApiError {
            status,
            error: i18n.translate(&locale.0, key),
            details,
        }
    }
}

// A resposta de erro que efetivamente vai para o cliente
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
