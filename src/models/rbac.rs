// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// As telas (módulos) do sistema. Também é a unidade de permissão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewType {
    Dashboard,
    Tickets,
    Crm,
    ProjectPipeline,
    FinancialPipeline,
    AdminMgmt,
    ClientPortal,
    Settings,
    ClientDetail,
    ServicesCatalog,
    StaffEdit,
    ProjectCreate,
    AuditLog,
}

impl ViewType {
    /// Telas "filhas" herdam a permissão da tela principal
    pub fn parent(self) -> ViewType {
        match self {
            ViewType::ClientDetail => ViewType::Crm,
            ViewType::ProjectCreate => ViewType::ProjectPipeline,
            ViewType::StaffEdit => ViewType::AdminMgmt,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrudAction {
    View,
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CrudPermissions {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl CrudPermissions {
    /// Padrão aplicado quando uma tela é liberada para um colaborador
    pub const DEFAULT: CrudPermissions = CrudPermissions {
        view: true,
        create: false,
        edit: false,
        delete: false,
    };

    pub fn allows(&self, action: CrudAction) -> bool {
        match action {
            CrudAction::View => self.view,
            CrudAction::Create => self.create,
            CrudAction::Edit => self.edit,
            CrudAction::Delete => self.delete,
        }
    }
}

impl Default for CrudPermissions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Quais projetos um colaborador enxerga
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ProjectAccess {
    All(AllProjects),
    Only(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AllProjects {
    #[serde(rename = "ALL")]
    All,
}

impl ProjectAccess {
    pub fn all() -> Self {
        ProjectAccess::All(AllProjects::All)
    }

    pub fn allows(&self, project_id: &str) -> bool {
        match self {
            ProjectAccess::All(_) => true,
            ProjectAccess::Only(ids) => ids.iter().any(|id| id == project_id),
        }
    }
}

impl Default for ProjectAccess {
    fn default() -> Self {
        Self::all()
    }
}
