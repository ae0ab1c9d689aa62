// src/db/crm_repo.rs

use crate::{
    common::error::AppError,
    db::db::Store,
    models::{auth::AccountStatus, crm::Customer},
};

// O que foi removido junto com o cliente
#[derive(Debug)]
pub struct CascadeRemoval {
    pub customer: Customer,
    pub projects_removed: usize,
    pub tickets_removed: usize,
}

#[derive(Clone)]
pub struct CrmRepository {
    store: Store,
}

impl CrmRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Customer> {
        self.store.read().await.customers.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Customer> {
        let ws = self.store.read().await;
        ws.customers.iter().find(|c| c.id == id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<Customer> {
        let ws = self.store.read().await;
        ws.customers
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
    }

    pub async fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        let ws = self.store.read().await;
        ws.customers.iter().any(|c| {
            c.email.eq_ignore_ascii_case(email.trim()) && Some(c.id.as_str()) != except_id
        })
    }

    pub async fn count_pending(&self) -> usize {
        let ws = self.store.read().await;
        ws.customers
            .iter()
            .filter(|c| c.account_status == AccountStatus::Pending)
            .count()
    }

    // Insere o cliente. A unicidade do e-mail é checada sob o mesmo lock de escrita.
    pub async fn create(&self, customer: Customer) -> Result<Customer, AppError> {
        let mut ws = self.store.write().await;
        if ws.customers.iter().any(|c| c.email.eq_ignore_ascii_case(&customer.email)) {
            return Err(AppError::EmailAlreadyExists);
        }
        ws.customers.push(customer.clone());
        Ok(customer)
    }

    pub async fn update<F, R>(&self, id: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Customer) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        let customer = ws
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;
        f(customer)
    }

    /// Como `update`, mas recusa `email` já usado por outro cliente.
    /// A checagem e a escrita acontecem sob o mesmo lock.
    pub async fn update_with_unique_email<F, R>(
        &self,
        id: &str,
        email: Option<&str>,
        f: F,
    ) -> Result<R, AppError>
    where
        F: FnOnce(&mut Customer) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        if let Some(email) = email {
            if ws.customers.iter().any(|c| c.email.eq_ignore_ascii_case(email) && c.id != id) {
                return Err(AppError::EmailAlreadyExists);
            }
        }
        let customer = ws
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;
        f(customer)
    }

    // Remove o cliente, seus projetos e seus chamados numa única escrita
    pub async fn delete_cascade(&self, id: &str) -> Result<CascadeRemoval, AppError> {
        let mut ws = self.store.write().await;
        let pos = ws
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;
        let customer = ws.customers.remove(pos);

        let projects_before = ws.projects.len();
        ws.projects.retain(|p| p.client_id != id);
        let tickets_before = ws.tickets.len();
        ws.tickets.retain(|t| t.client_id != id);

        Ok(CascadeRemoval {
            projects_removed: projects_before - ws.projects.len(),
            tickets_removed: tickets_before - ws.tickets.len(),
            customer,
        })
    }
}
