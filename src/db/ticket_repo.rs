// src/db/ticket_repo.rs

use crate::{
    common::error::AppError,
    db::db::Store,
    models::tickets::Ticket,
};

#[derive(Clone)]
pub struct TicketRepository {
    store: Store,
}

impl TicketRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Ticket> {
        self.store.read().await.tickets.clone()
    }

    pub async fn list_by_client(&self, client_id: &str) -> Vec<Ticket> {
        let ws = self.store.read().await;
        ws.tickets
            .iter()
            .filter(|t| t.client_id == client_id)
            .cloned()
            .collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Ticket> {
        let ws = self.store.read().await;
        ws.tickets.iter().find(|t| t.id == id).cloned()
    }

    // Chamados novos entram no topo da fila
    pub async fn create<F>(&self, build: F) -> Ticket
    where
        F: FnOnce(String) -> Ticket,
    {
        let mut ws = self.store.write().await;
        let id = ws.sequences.next_ticket_id();
        let ticket = build(id);
        ws.tickets.insert(0, ticket.clone());
        ticket
    }

    pub async fn update<F, R>(&self, id: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Ticket) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        let ticket = ws
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::TicketNotFound(id.to_string()))?;
        f(ticket)
    }
}
