// src/db/db.rs

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{
    audit::AuditLog,
    auth::User,
    catalog::Service,
    crm::Customer,
    projects::Project,
    settings::SystemManifest,
    tickets::Ticket,
};

/// Todo o estado da aplicação. Vive em memória, semeado na inicialização.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub users: Vec<User>,
    pub customers: Vec<Customer>,
    pub projects: Vec<Project>,
    pub tickets: Vec<Ticket>,
    pub services: Vec<Service>,
    // Mais recente primeiro
    pub audit_logs: Vec<AuditLog>,
    pub manifest: SystemManifest,
    pub sequences: Sequences,
}

/// Numeração legível dos projetos (PRJ-1001) e chamados (TKT-1001)
#[derive(Debug, Clone, Copy)]
pub struct Sequences {
    pub last_project: u32,
    pub last_ticket: u32,
}

impl Sequences {
    pub fn next_project_id(&mut self) -> String {
        self.last_project += 1;
        format!("PRJ-{}", self.last_project)
    }

    pub fn next_ticket_id(&mut self) -> String {
        self.last_ticket += 1;
        format!("TKT-{}", self.last_ticket)
    }
}

/// O "pool" compartilhado pelos repositórios. Uma escrita = um lock.
pub type Store = Arc<RwLock<Workspace>>;

pub fn new_store(workspace: Workspace) -> Store {
    Arc::new(RwLock::new(workspace))
}

/// IDs opacos com prefixo (cust-..., u-..., srv-...)
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}
