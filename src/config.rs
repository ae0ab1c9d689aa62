// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;

use crate::{
    common::i18n::I18nStore,
    db::{
        new_store, seed::seed_workspace, AuditRepository, CatalogRepository, CrmRepository,
        ProjectRepository, SettingsRepository, Store, TicketRepository, UserRepository,
    },
    services::{
        audit_service::AuditService, auth::AuthService, catalog_service::CatalogService,
        crm_service::CrmService, dashboard_service::DashboardService,
        finance_service::FinanceService, portal_service::PortalService,
        project_service::ProjectService, settings_service::SettingsService,
        staff_service::StaffService, ticket_service::TicketService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
// 7 dias
const DEFAULT_JWT_TTL_HOURS: i64 = 168;

/// Configuração lida do ambiente (.env via dotenvy)
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub bind_addr: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("APP_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let jwt_ttl_hours = match env::var("JWT_TTL_HOURS") {
            Ok(v) => v.parse().context("JWT_TTL_HOURS deve ser um número inteiro")?,
            Err(_) => DEFAULT_JWT_TTL_HOURS,
        };
        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(v) => v.parse().context("BCRYPT_COST deve ser um número inteiro")?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Self { jwt_secret, bind_addr, jwt_ttl_hours, bcrypt_cost })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub audit_service: AuditService,
    pub crm_service: CrmService,
    pub project_service: ProjectService,
    pub finance_service: FinanceService,
    pub ticket_service: TicketService,
    pub catalog_service: CatalogService,
    pub staff_service: StaffService,
    pub settings_service: SettingsService,
    pub dashboard_service: DashboardService,
    pub portal_service: PortalService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Hash das senhas da semente fora do runtime assíncrono
        let cost = config.bcrypt_cost;
        let workspace = tokio::task::spawn_blocking(move || seed_workspace(cost))
            .await
            .context("Falha na task de semeadura")??;

        tracing::info!(
            "✅ Workspace semeado: {} colaboradores, {} clientes, {} chamados",
            workspace.users.len(),
            workspace.customers.len(),
            workspace.tickets.len()
        );

        Ok(Self::from_store(config, new_store(workspace)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_store(config: Config, store: Store) -> Self {
        let user_repo = UserRepository::new(store.clone());
        let crm_repo = CrmRepository::new(store.clone());
        let project_repo = ProjectRepository::new(store.clone());
        let ticket_repo = TicketRepository::new(store.clone());
        let catalog_repo = CatalogRepository::new(store.clone());
        let audit_repo = AuditRepository::new(store.clone());
        let settings_repo = SettingsRepository::new(store);

        let audit_service = AuditService::new(audit_repo);

        let auth_service = AuthService::new(
            user_repo.clone(),
            crm_repo.clone(),
            audit_service.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
            config.bcrypt_cost,
        );
        let crm_service = CrmService::new(
            crm_repo.clone(),
            project_repo.clone(),
            ticket_repo.clone(),
            audit_service.clone(),
            config.bcrypt_cost,
        );
        let project_service = ProjectService::new(project_repo.clone(), audit_service.clone());
        let finance_service = FinanceService::new(project_repo.clone(), crm_repo.clone(), settings_repo.clone());
        let ticket_service = TicketService::new(ticket_repo.clone(), project_repo.clone());
        let catalog_service = CatalogService::new(catalog_repo, audit_service.clone());
        let staff_service = StaffService::new(user_repo, audit_service.clone(), config.bcrypt_cost);
        let settings_service = SettingsService::new(settings_repo.clone(), audit_service.clone());
        let dashboard_service = DashboardService::new(
            project_repo.clone(),
            ticket_repo.clone(),
            settings_repo.clone(),
            audit_service.clone(),
        );
        let portal_service = PortalService::new(crm_repo, project_repo, ticket_repo, settings_repo);

        Self {
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            audit_service,
            crm_service,
            project_service,
            finance_service,
            ticket_service,
            catalog_service,
            staff_service,
            settings_service,
            dashboard_service,
            portal_service,
        }
    }

    /// Estado semeado com custo mínimo de bcrypt, para os testes
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let config = Config {
            jwt_secret: "segredo-de-teste".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_ttl_hours: DEFAULT_JWT_TTL_HOURS,
            bcrypt_cost: 4,
        };
        let workspace = seed_workspace(config.bcrypt_cost).expect("semente de teste");
        Self::from_store(config, new_store(workspace))
    }
}
