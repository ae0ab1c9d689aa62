// src/db/settings_repo.rs

use crate::{db::db::Store, models::settings::SystemManifest};

#[derive(Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> SystemManifest {
        self.store.read().await.manifest.clone()
    }

    pub async fn currency(&self) -> String {
        self.store.read().await.manifest.global.currency.clone()
    }

    // Troca o manifesto inteiro e devolve o anterior
    pub async fn replace(&self, manifest: SystemManifest) -> SystemManifest {
        let mut ws = self.store.write().await;
        std::mem::replace(&mut ws.manifest, manifest)
    }
}
