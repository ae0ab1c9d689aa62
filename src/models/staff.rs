// src/models/staff.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::validation::not_blank,
    models::{
        auth::{AccountStatus, UserRole},
        rbac::{CrudPermissions, ProjectAccess, ViewType},
    },
};

// Contas CLIENT vivem no CRM; a equipe só tem ADMIN e STAFF
fn staff_role(role: &UserRole) -> Result<(), ValidationError> {
    match role {
        UserRole::Client => Err(ValidationError::new("invalid_role").with_message("invalid_role".into())),
        UserRole::Admin | UserRole::Staff => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffPayload {
    #[validate(custom(function = not_blank))]
    #[schema(example = "Omar Haddad")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "omar.h@securelogx.com")]
    pub email: String,

    #[serde(default = "default_role")]
    #[validate(custom(function = staff_role))]
    pub role: UserRole,

    // Sem senha o colaborador só entra depois que alguém definir uma
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Staff
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffPayload {
    #[validate(custom(function = not_blank))]
    pub name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    #[validate(custom(function = staff_role))]
    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: Option<String>,
    pub avatar: Option<String>,
    pub mfa_enabled: Option<bool>,
    pub permissions: Option<Vec<ViewType>>,
    pub crud_permissions: Option<BTreeMap<ViewType, CrudPermissions>>,
    pub project_access: Option<ProjectAccess>,
}
