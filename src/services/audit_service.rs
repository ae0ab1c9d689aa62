// src/services/audit_service.rs

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::AuditRepository,
    models::{audit::AuditLog, auth::Principal},
};

#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    /// Registra quem fez, quando, e o estado antes/depois (já serializado)
    pub async fn log_action<B, A>(
        &self,
        actor: &Principal,
        before: Option<&B>,
        after: Option<&A>,
    ) -> Result<(), AppError>
    where
        B: Serialize,
        A: Serialize,
    {
        let before_change = before.map(serde_json::to_value).transpose()?;
        let after_change = after.map(serde_json::to_value).transpose()?;

        self.repo
            .prepend(AuditLog {
                user_name: actor.name.clone(),
                user_email: actor.email.clone(),
                action_datetime: Utc::now(),
                before_change,
                after_change,
            })
            .await;

        tracing::info!("📝 Auditoria registrada para {}", actor.email);
        Ok(())
    }

    // Busca por nome ou e-mail de quem agiu; mais recente primeiro
    pub async fn search(&self, query: Option<&str>) -> Vec<AuditLog> {
        let logs = self.repo.list().await;
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            None => logs,
            Some(q) => {
                let q = q.to_lowercase();
                logs.into_iter()
                    .filter(|l| {
                        l.user_name.to_lowercase().contains(&q)
                            || l.user_email.to_lowercase().contains(&q)
                    })
                    .collect()
            }
        }
    }

    pub async fn recent(&self, limit: usize) -> Vec<AuditLog> {
        self.repo.recent(limit).await
    }
}

// Atalho para auditorias em que um dos lados não existe (criação / remoção)
pub const NOTHING: Option<&Value> = None;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{new_store, seed::seed_workspace};
    use serde_json::json;

    async fn service_and_admin() -> (AuditService, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        (AuditService::new(AuditRepository::new(new_store(ws))), admin)
    }

    #[tokio::test]
    async fn newest_entry_comes_first() {
        let (audit, admin) = service_and_admin().await;
        audit.log_action(&admin, NOTHING, Some(&json!({"step": 1}))).await.unwrap();
        audit.log_action(&admin, NOTHING, Some(&json!({"step": 2}))).await.unwrap();

        let logs = audit.search(None).await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].after_change, Some(json!({"step": 2})));
        assert!(logs[0].before_change.is_none());
    }

    #[tokio::test]
    async fn search_matches_name_or_email() {
        let (audit, admin) = service_and_admin().await;
        audit.log_action(&admin, Some(&json!(1)), Some(&json!(2))).await.unwrap();

        assert_eq!(audit.search(Some("SECURELOGX ADMIN")).await.len(), 1);
        assert_eq!(audit.search(Some("admin@securelogx")).await.len(), 1);
        assert!(audit.search(Some("nobody")).await.is_empty());
    }
}
