// src/db/catalog_repo.rs

use crate::{
    common::error::AppError,
    db::db::Store,
    models::catalog::Service,
};

#[derive(Clone)]
pub struct CatalogRepository {
    store: Store,
}

impl CatalogRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Service> {
        self.store.read().await.services.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Service> {
        let ws = self.store.read().await;
        ws.services.iter().find(|s| s.id == id).cloned()
    }

    pub async fn create(&self, service: Service) -> Service {
        self.store.write().await.services.push(service.clone());
        service
    }

    pub async fn update<F, R>(&self, id: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Service) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        let service = ws
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))?;
        f(service)
    }

    pub async fn delete(&self, id: &str) -> Result<Service, AppError> {
        let mut ws = self.store.write().await;
        let pos = ws
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))?;
        Ok(ws.services.remove(pos))
    }
}
