// src/services/catalog_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_id, CatalogRepository},
    models::{
        auth::Principal,
        catalog::{CreateServicePayload, Service, UpdateServicePayload},
    },
    services::{
        audit_service::{AuditService, NOTHING},
        finance_service::bounded_money,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    audit: AuditService,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self) -> Vec<Service> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Service, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))
    }

    pub async fn create(&self, actor: &Principal, payload: CreateServicePayload) -> Result<Service, AppError> {
        payload.validate()?;
        if payload.base_price.is_sign_negative() {
            return Err(AppError::InvalidAmount);
        }
        let base_price = bounded_money(payload.base_price)?;

        let service = self
            .repo
            .create(Service {
                id: new_id("srv"),
                name: payload.name.trim().to_string(),
                description: payload.description,
                base_price,
            })
            .await;

        self.audit.log_action(actor, NOTHING, Some(&service)).await?;
        tracing::info!("🧰 Serviço {} adicionado ao catálogo", service.name);
        Ok(service)
    }

    pub async fn update(
        &self,
        actor: &Principal,
        id: &str,
        payload: UpdateServicePayload,
    ) -> Result<Service, AppError> {
        payload.validate()?;
        if payload.base_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(AppError::InvalidAmount);
        }
        let base_price = payload.base_price.map(bounded_money).transpose()?;

        let (before, after) = self
            .repo
            .update(id, |s| {
                let before = s.clone();
                if let Some(v) = payload.name { s.name = v.trim().to_string(); }
                if let Some(v) = payload.description { s.description = v; }
                if let Some(v) = base_price { s.base_price = v; }
                Ok((before, s.clone()))
            })
            .await?;

        self.audit.log_action(actor, Some(&before), Some(&after)).await?;
        Ok(after)
    }

    pub async fn delete(&self, actor: &Principal, id: &str) -> Result<(), AppError> {
        let removed = self.repo.delete(id).await?;
        self.audit.log_action(actor, Some(&removed), NOTHING).await?;
        tracing::info!("🗑️ Serviço {} removido do catálogo", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::db::{new_store, seed::seed_workspace, AuditRepository, Store};

    fn setup() -> (CatalogService, Store, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        let store = new_store(ws);
        let svc = CatalogService::new(
            CatalogRepository::new(store.clone()),
            AuditService::new(AuditRepository::new(store.clone())),
        );
        (svc, store, admin)
    }

    #[tokio::test]
    async fn every_mutation_is_audited() {
        let (svc, store, admin) = setup();
        let s = svc
            .create(&admin, CreateServicePayload {
                name: "Pen Test".to_string(),
                description: "External perimeter test.".to_string(),
                base_price: Decimal::from(8000),
            })
            .await
            .unwrap();
        assert_eq!(svc.list().await.len(), 4);

        let u = svc
            .update(&admin, &s.id, UpdateServicePayload { base_price: Some(Decimal::from(9000)), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(u.base_price, Decimal::from(9000));
        assert_eq!(u.name, "Pen Test");

        svc.delete(&admin, &s.id).await.unwrap();
        assert!(matches!(svc.get(&s.id).await.unwrap_err(), AppError::ServiceNotFound(_)));

        let ws = store.read().await;
        assert_eq!(ws.audit_logs.len(), 3);
        // O mais recente (remoção) vem primeiro
        assert!(ws.audit_logs[0].after_change.is_none());
        assert!(ws.audit_logs[2].before_change.is_none());
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let (svc, _, admin) = setup();
        let err = svc
            .update(&admin, "srv-1", UpdateServicePayload { base_price: Some(Decimal::from(-1)), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount));
    }

    #[tokio::test]
    async fn price_above_bound_is_rejected() {
        let (svc, _, admin) = setup();
        let err = svc
            .create(&admin, CreateServicePayload {
                name: "Unbounded".to_string(),
                description: String::new(),
                base_price: Decimal::MAX,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
        assert_eq!(svc.list().await.len(), 3);
    }
}
