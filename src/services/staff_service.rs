// src/services/staff_service.rs

use std::collections::BTreeMap;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_id, UserRepository},
    models::{
        auth::{AccountStatus, Principal, User},
        rbac::{CrudPermissions, ProjectAccess, ViewType},
        staff::{CreateStaffPayload, UpdateStaffPayload},
    },
    services::{
        audit_service::{AuditService, NOTHING},
        auth::hash_password,
    },
};

/// Telas liberadas para um colaborador recém-provisionado
pub const DEFAULT_PERMISSIONS: &[ViewType] = &[ViewType::Dashboard];

/// Mantém o mapa CRUD coerente com a lista de telas:
/// telas removidas perdem a entrada, telas novas ganham o padrão (só ver).
pub fn normalize_crud(
    permissions: &[ViewType],
    mut crud: BTreeMap<ViewType, CrudPermissions>,
) -> BTreeMap<ViewType, CrudPermissions> {
    crud.retain(|view, _| permissions.contains(view));
    for view in permissions {
        crud.entry(*view).or_insert(CrudPermissions::DEFAULT);
    }
    crud
}

#[derive(Clone)]
pub struct StaffService {
    repo: UserRepository,
    audit: AuditService,
    bcrypt_cost: u32,
}

impl StaffService {
    pub fn new(repo: UserRepository, audit: AuditService, bcrypt_cost: u32) -> Self {
        Self { repo, audit, bcrypt_cost }
    }

    pub async fn list(&self) -> Vec<User> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> Result<User, AppError> {
        self.repo.find_by_id(id).await.ok_or(AppError::UserNotFound)
    }

    pub async fn create(&self, actor: &Principal, payload: CreateStaffPayload) -> Result<User, AppError> {
        payload.validate()?;

        let password_hash = match payload.password.as_deref() {
            Some(pwd) => Some(hash_password(pwd, self.bcrypt_cost).await?),
            None => None,
        };

        let email = payload.email.trim().to_lowercase();
        let user = self
            .repo
            .create(User {
                id: new_id("u"),
                name: payload.name.trim().to_string(),
                avatar: Some(format!("https://picsum.photos/seed/{email}/100/100")),
                email,
                role: payload.role,
                status: AccountStatus::Approved,
                company: None,
                password_hash,
                mfa_enabled: false,
                permissions: DEFAULT_PERMISSIONS.to_vec(),
                crud_permissions: BTreeMap::new(),
                project_access: ProjectAccess::all(),
            })
            .await?;

        self.audit.log_action(actor, NOTHING, Some(&user)).await?;
        tracing::info!("👥 Colaborador {} provisionado por {}", user.email, actor.email);
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: &Principal,
        id: &str,
        payload: UpdateStaffPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;

        // O hash sai antes do lock; o e-mail é conferido dentro dele
        let new_hash = match payload.password.as_deref() {
            Some(pwd) => Some(hash_password(pwd, self.bcrypt_cost).await?),
            None => None,
        };

        let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());
        let (before, after) = self
            .repo
            .update_with_unique_email(id, email.as_deref(), |u| {
                let before = u.clone();
                if let Some(v) = payload.name { u.name = v.trim().to_string(); }
                if let Some(v) = email.clone() { u.email = v; }
                if let Some(v) = payload.role { u.role = v; }
                if let Some(v) = payload.status { u.status = v; }
                if let Some(v) = payload.avatar { u.avatar = Some(v); }
                if let Some(v) = payload.mfa_enabled { u.mfa_enabled = v; }
                if let Some(v) = payload.project_access { u.project_access = v; }
                if new_hash.is_some() { u.password_hash = new_hash; }

                let permissions_changed = payload.permissions.is_some() || payload.crud_permissions.is_some();
                if let Some(v) = payload.permissions { u.permissions = v; }
                if let Some(v) = payload.crud_permissions { u.crud_permissions = v; }
                if permissions_changed {
                    u.crud_permissions = normalize_crud(&u.permissions, std::mem::take(&mut u.crud_permissions));
                }
                Ok((before, u.clone()))
            })
            .await?;

        self.audit.log_action(actor, Some(&before), Some(&after)).await?;
        tracing::info!("✏️ Colaborador {} atualizado por {}", after.email, actor.email);
        Ok(after)
    }

    pub async fn delete(&self, actor: &Principal, id: &str) -> Result<(), AppError> {
        if self.get(id).await?.is_root_admin() {
            return Err(AppError::RootAdminProtected);
        }
        let removed = self.repo.delete(id).await?;

        self.audit.log_action(actor, Some(&removed), NOTHING).await?;
        tracing::info!("🗑️ Colaborador {} removido por {}", removed.email, actor.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{new_store, seed::seed_workspace, AuditRepository, Store},
        models::auth::UserRole,
    };

    fn setup() -> (StaffService, Store, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        let store = new_store(ws);
        let svc = StaffService::new(
            UserRepository::new(store.clone()),
            AuditService::new(AuditRepository::new(store.clone())),
            4,
        );
        (svc, store, admin)
    }

    fn new_staff(email: &str) -> CreateStaffPayload {
        CreateStaffPayload {
            name: "Omar Haddad".to_string(),
            email: email.to_string(),
            role: UserRole::Staff,
            password: None,
        }
    }

    #[test]
    fn normalization_drops_revoked_and_defaults_new_views() {
        let crud = BTreeMap::from([
            (ViewType::Crm, CrudPermissions { view: true, create: true, edit: true, delete: true }),
            (ViewType::Tickets, CrudPermissions { view: true, create: false, edit: true, delete: false }),
        ]);
        let out = normalize_crud(&[ViewType::Tickets, ViewType::Dashboard], crud);

        assert!(!out.contains_key(&ViewType::Crm));
        assert!(out[&ViewType::Tickets].edit);
        assert_eq!(out[&ViewType::Dashboard], CrudPermissions::DEFAULT);
    }

    #[tokio::test]
    async fn provisioning_uses_defaults() {
        let (svc, store, admin) = setup();
        let u = svc.create(&admin, new_staff("  Omar.H@SecureLogx.com ")).await.unwrap();

        assert_eq!(u.email, "omar.h@securelogx.com");
        assert_eq!(u.status, AccountStatus::Approved);
        assert_eq!(u.permissions, vec![ViewType::Dashboard]);
        assert!(u.crud_permissions.is_empty());
        assert_eq!(u.project_access, ProjectAccess::all());
        assert!(u.password_hash.is_none());
        assert_eq!(store.read().await.audit_logs.len(), 1);

        let dup = svc.create(&admin, new_staff("omar.h@securelogx.com")).await.unwrap_err();
        assert!(matches!(dup, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn update_normalizes_permissions() {
        let (svc, _, admin) = setup();
        let u = svc
            .update(&admin, "u-2", UpdateStaffPayload {
                permissions: Some(vec![ViewType::Crm, ViewType::Settings]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!u.crud_permissions.contains_key(&ViewType::Tickets));
        assert_eq!(u.crud_permissions[&ViewType::Crm], CrudPermissions::DEFAULT);
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let (svc, _, admin) = setup();
        let err = svc
            .update(&admin, "u-2", UpdateStaffPayload { email: Some("ADMIN@securelogx.com".to_string()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn root_admin_cannot_be_deleted() {
        let (svc, _, admin) = setup();
        assert!(matches!(svc.delete(&admin, "u-admin").await.unwrap_err(), AppError::RootAdminProtected));

        svc.delete(&admin, "u-2").await.unwrap();
        assert!(matches!(svc.get("u-2").await.unwrap_err(), AppError::UserNotFound));
    }

    #[tokio::test]
    async fn client_role_is_not_a_staff_role() {
        let (svc, store, admin) = setup();

        let mut client = new_staff("client.like@securelogx.com");
        client.role = UserRole::Client;
        let err = svc.create(&admin, client).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = svc
            .update(&admin, "u-2", UpdateStaffPayload { role: Some(UserRole::Client), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let ws = store.read().await;
        assert_eq!(ws.users.len(), 2);
        assert_eq!(ws.users[1].role, UserRole::Staff);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (svc, _, admin) = setup();
        let err = svc
            .update(&admin, "u-2", UpdateStaffPayload { name: Some("   ".to_string()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn concurrent_email_changes_leave_one_owner() {
        let (svc, store, admin) = setup();
        let omar = svc.create(&admin, new_staff("omar.h@securelogx.com")).await.unwrap();
        let target = || UpdateStaffPayload {
            email: Some("shared@securelogx.com".to_string()),
            password: Some("new-secret".to_string()),
            ..Default::default()
        };

        let (a, b) = tokio::join!(svc.update(&admin, "u-2", target()), svc.update(&admin, &omar.id, target()));
        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), AppError::EmailAlreadyExists));

        let ws = store.read().await;
        assert_eq!(ws.users.iter().filter(|u| u.email == "shared@securelogx.com").count(), 1);
    }
}
