// src/db/user_repo.rs

use crate::{
    common::error::AppError,
    db::db::Store,
    models::auth::User,
};

// O repositório de colaboradores, responsável pela coleção 'users' do workspace
#[derive(Clone)]
pub struct UserRepository {
    store: Store,
}

impl UserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<User> {
        self.store.read().await.users.clone()
    }

    // Busca um colaborador pelo e-mail (sem diferenciar maiúsculas)
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let ws = self.store.read().await;
        ws.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        let ws = self.store.read().await;
        ws.users.iter().find(|u| u.id == id).cloned()
    }

    /// `except_id` permite que o próprio registro mantenha o e-mail numa edição
    // Primeiro colaborador cadastrado: responsável padrão por novos clientes
    pub async fn first_staff_id(&self) -> Option<String> {
        self.store.read().await.users.first().map(|u| u.id.clone())
    }

    // Cria um novo colaborador, checando o e-mail dentro do mesmo lock
    pub async fn create(&self, user: User) -> Result<User, AppError> {
        let mut ws = self.store.write().await;
        if ws.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::EmailAlreadyExists);
        }
        ws.users.push(user.clone());
        Ok(user)
    }

    /// Aplica `f` ao colaborador e devolve o que a closure retornar
    pub async fn update<F, R>(&self, id: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut User) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        let user = ws
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        f(user)
    }

    /// `update` com a unicidade do novo e-mail checada dentro do lock de escrita
    pub async fn update_with_unique_email<F, R>(
        &self,
        id: &str,
        email: Option<&str>,
        f: F,
    ) -> Result<R, AppError>
    where
        F: FnOnce(&mut User) -> Result<R, AppError>,
    {
        let mut ws = self.store.write().await;
        if let Some(email) = email {
            if ws.users.iter().any(|u| u.email.eq_ignore_ascii_case(email) && u.id != id) {
                return Err(AppError::EmailAlreadyExists);
            }
        }
        let user = ws
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        f(user)
    }

    pub async fn delete(&self, id: &str) -> Result<User, AppError> {
        let mut ws = self.store.write().await;
        let pos = ws
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        Ok(ws.users.remove(pos))
    }
}
