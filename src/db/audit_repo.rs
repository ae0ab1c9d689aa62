// src/db/audit_repo.rs

use crate::{db::db::Store, models::audit::AuditLog};

#[derive(Clone)]
pub struct AuditRepository {
    store: Store,
}

impl AuditRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // Sempre no início: a lista fica do mais recente para o mais antigo
    pub async fn prepend(&self, entry: AuditLog) {
        self.store.write().await.audit_logs.insert(0, entry);
    }

    pub async fn list(&self) -> Vec<AuditLog> {
        self.store.read().await.audit_logs.clone()
    }

    pub async fn recent(&self, limit: usize) -> Vec<AuditLog> {
        let ws = self.store.read().await;
        ws.audit_logs.iter().take(limit).cloned().collect()
    }
}
