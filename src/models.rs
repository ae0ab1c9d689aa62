pub mod attachment;
pub mod audit;
pub mod auth;
pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod portal;
pub mod projects;
pub mod rbac;
pub mod settings;
pub mod staff;
pub mod tickets;
