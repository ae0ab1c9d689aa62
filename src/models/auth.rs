// src/models/auth.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::not_blank,
    models::{
        crm::Customer,
        rbac::{CrudPermissions, ProjectAccess, ViewType},
    },
};

/// ID do administrador raiz (semente). Não pode ser removido e ignora checagens.
pub const ROOT_ADMIN_ID: &str = "u-admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Staff,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

// Colaborador / administrador
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "u-2")]
    pub id: String,
    #[schema(example = "Sarah Kim")]
    pub name: String,
    #[schema(example = "sarah.k@securelogx.com")]
    pub email: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub avatar: Option<String>,
    pub company: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: Option<String>,

    pub mfa_enabled: bool,
    pub permissions: Vec<ViewType>,
    pub crud_permissions: BTreeMap<ViewType, CrudPermissions>,
    pub project_access: ProjectAccess,
}

impl User {
    pub fn is_root_admin(&self) -> bool {
        self.id == ROOT_ADMIN_ID
    }
}

/// Quem está fazendo a requisição: um colaborador ou um cliente logado no portal
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub avatar: Option<String>,
    pub company: Option<String>,
    pub permissions: Vec<ViewType>,
    pub crud_permissions: BTreeMap<ViewType, CrudPermissions>,
    pub project_access: ProjectAccess,
}

impl Principal {
    pub fn is_root_admin(&self) -> bool {
        self.id == ROOT_ADMIN_ID
    }

    pub fn is_client(&self) -> bool {
        self.role == UserRole::Client
    }

    pub fn is_admin(&self) -> bool {
        self.is_root_admin() || self.role == UserRole::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            avatar: user.avatar.clone(),
            company: user.company.clone(),
            permissions: user.permissions.clone(),
            crud_permissions: user.crud_permissions.clone(),
            project_access: user.project_access.clone(),
        }
    }
}

impl From<&Customer> for Principal {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            role: UserRole::Client,
            status: customer.account_status,
            avatar: Some(format!("https://picsum.photos/seed/{}/100/100", customer.email)),
            company: Some(customer.company.clone()),
            permissions: vec![ViewType::ClientPortal, ViewType::Settings],
            crud_permissions: BTreeMap::new(),
            project_access: ProjectAccess::Only(Vec::new()),
        }
    }
}

// Qual "porta" de login está sendo usada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginMode {
    #[default]
    Staff,
    Client,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@securelogx.com")]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
    #[serde(default)]
    pub mode: LoginMode,
}

// Auto-cadastro do cliente (fica PENDENTE até aprovação)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientPayload {
    #[validate(custom(function = not_blank))]
    #[schema(example = "Michael Chen")]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "m.chen@globaltech.com")]
    pub email: String,
    #[validate(custom(function = not_blank))]
    #[schema(example = "Global Tech Solutions")]
    pub company: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: Principal,
    pub landing_view: ViewType,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub customer_id: String,
    pub account_status: AccountStatus,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(custom(function = not_blank))]
    pub name: Option<String>,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: Option<String>,
    pub avatar: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // ID do colaborador ou do cliente
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}
