pub mod audit_service;
pub mod auth;
pub mod catalog_service;
pub mod crm_service;
pub mod dashboard_service;
pub mod finance_service;
pub mod portal_service;
pub mod project_service;
pub mod rbac_service;
pub mod settings_service;
pub mod staff_service;
pub mod ticket_service;
