pub mod db;
pub mod seed;

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod ticket_repo;
pub use ticket_repo::TicketRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;

pub use db::{new_id, new_store, Store};
