// src/services/settings_service.rs

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::{
        auth::Principal,
        settings::{PublicManifest, SystemManifest},
    },
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    audit: AuditService,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    // Tela de login: marca e textos, sem a configuração de e-mail
    pub async fn public_manifest(&self) -> PublicManifest {
        PublicManifest::from(&self.repo.get().await)
    }

    pub async fn get(&self) -> SystemManifest {
        self.repo.get().await
    }

    /// Substitui o manifesto inteiro. Só administradores.
    /// Senhas vazias no payload mantêm o segredo já gravado.
    pub async fn replace(
        &self,
        actor: &Principal,
        mut incoming: SystemManifest,
    ) -> Result<SystemManifest, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden("ADMIN".to_string()));
        }

        let current = self.repo.get().await;
        if incoming.email.auth.pass.is_empty() {
            incoming.email.auth.pass = current.email.auth.pass.clone();
        }
        if incoming.email.incoming_pass.is_empty() {
            incoming.email.incoming_pass = current.email.incoming_pass.clone();
        }

        let before = self.repo.replace(incoming.clone()).await;

        self.audit.log_action(actor, Some(&before), Some(&incoming)).await?;
        tracing::info!("⚙️ Manifesto atualizado por {}", actor.email);
        Ok(incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{new_store, seed::seed_workspace, AuditRepository, Store};

    fn setup() -> (SettingsService, Store, Principal, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        let sarah = Principal::from(&ws.users[1]);
        let store = new_store(ws);
        let svc = SettingsService::new(
            SettingsRepository::new(store.clone()),
            AuditService::new(AuditRepository::new(store.clone())),
        );
        (svc, store, admin, sarah)
    }

    #[tokio::test]
    async fn public_manifest_has_no_email_section() {
        let (svc, _, _, _) = setup();
        let json = serde_json::to_value(svc.public_manifest().await).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["global"]["siteTitle"], "SX MGMT");
    }

    #[tokio::test]
    async fn only_admins_replace_the_manifest() {
        let (svc, _, _, sarah) = setup();
        let m = svc.get().await;
        assert!(matches!(svc.replace(&sarah, m).await.unwrap_err(), AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn empty_password_keeps_stored_secret() {
        let (svc, store, admin, _) = setup();

        let mut m = svc.get().await;
        m.email.auth.pass = "s3cret".to_string();
        svc.replace(&admin, m).await.unwrap();

        let mut m = svc.get().await;
        m.global.site_title = "SX OPS".to_string();
        m.email.auth.pass = String::new();
        let saved = svc.replace(&admin, m).await.unwrap();

        assert_eq!(saved.global.site_title, "SX OPS");
        assert_eq!(store.read().await.manifest.email.auth.pass, "s3cret");

        // Segredo nunca sai serializado (nem na auditoria)
        let json = serde_json::to_value(&saved).unwrap();
        assert!(json["email"]["auth"].get("pass").is_none());
        let ws = store.read().await;
        assert_eq!(ws.audit_logs.len(), 2);
        assert!(ws.audit_logs[0].after_change.as_ref().unwrap()["email"]["auth"].get("pass").is_none());
    }
}
