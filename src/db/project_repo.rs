// src/db/project_repo.rs

use crate::{
    common::error::AppError,
    db::db::Store,
    models::projects::Project,
};

#[derive(Clone)]
pub struct ProjectRepository {
    store: Store,
}

impl ProjectRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Project> {
        self.store.read().await.projects.clone()
    }

    pub async fn list_by_client(&self, client_id: &str) -> Vec<Project> {
        let ws = self.store.read().await;
        ws.projects
            .iter()
            .filter(|p| p.client_id == client_id)
            .cloned()
            .collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Project> {
        let ws = self.store.read().await;
        ws.projects.iter().find(|p| p.id == id).cloned()
    }

    /// Reserva o próximo `PRJ-<n>` e insere o projeto montado por `build`.
    /// O cliente precisa existir no momento da escrita.
    pub async fn create<F>(&self, client_id: &str, build: F) -> Result<Project, AppError>
    where
        F: FnOnce(String) -> Project,
    {
        let mut ws = self.store.write().await;
        if !ws.customers.iter().any(|c| c.id == client_id) {
            return Err(AppError::CustomerNotFound(client_id.to_string()));
        }
        let id = ws.sequences.next_project_id();
        let project = build(id);
        ws.projects.push(project.clone());
        Ok(project)
    }

    pub async fn update<F, R>(&self, id: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Project) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        let project = ws
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::ProjectNotFound(id.to_string()))?;
        f(project)
    }
}
