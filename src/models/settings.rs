// src/models/settings.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Manifesto do sistema: marca, rótulos de navegação, e-mail e textos legais.
// É substituído por inteiro pela tela de configurações.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemManifest {
    pub global: GlobalSettings,
    pub auth: AuthScreenSettings,
    pub email: EmailSettings,
    pub navigation: NavigationLabels,
    pub dashboard: DashboardLabels,
    pub crm: CrmLabels,
    pub projects: ProjectLabels,
    pub tickets: TicketLabels,
    pub client_portal: ClientPortalLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub logo_url: String,
    #[schema(example = "#006B35")]
    pub primary_color: String,
    #[schema(example = "SX MGMT")]
    pub site_title: String,
    #[schema(example = "SAR")]
    pub currency: String,
    pub logo_width: u32,
    pub logo_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthScreenSettings {
    pub login_title: String,
    pub login_subtitle: String,
    pub banner_url: String,
    pub login_bg_color: String,
    pub login_bg_image_url: String,
    pub terms_content: String,
    pub privacy_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum EmailProvider {
    Smtp,
    Sendgrid,
    Mailgun,
    Ses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Encryption {
    None,
    Tls,
    Ssl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmailAuth {
    pub user: String,
    // Segredo só de escrita: nunca sai na resposta
    #[serde(skip_serializing, default)]
    pub pass: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub provider: EmailProvider,
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
    pub auth: EmailAuth,
    pub from_email: String,
    pub from_name: String,
    pub notifications_enabled: bool,
    pub incoming_enabled: bool,
    pub incoming_host: String,
    pub incoming_port: u16,
    pub incoming_encryption: Encryption,
    pub incoming_user: String,
    #[serde(skip_serializing, default)]
    pub incoming_pass: String,
    // Minutos
    pub fetch_interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NavigationLabels {
    pub dashboard: String,
    pub crm: String,
    pub projects: String,
    pub financials: String,
    pub tickets: String,
    pub admin: String,
    pub settings: String,
    pub services: String,
    pub audit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardLabels {
    pub title: String,
    pub subtitle: String,
    pub stat1: String,
    pub stat2: String,
    pub stat3: String,
    pub stat4: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrmLabels {
    pub title: String,
    pub subtitle: String,
    pub register_button: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectLabels {
    pub title: String,
    pub subtitle: String,
    pub stage1: String,
    pub stage2: String,
    pub stage3: String,
    pub stage4: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketLabels {
    pub title: String,
    pub priority_urgent: String,
    pub priority_high: String,
    pub priority_medium: String,
    pub priority_low: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPortalLabels {
    pub title: String,
    pub welcome_message: String,
    pub tab_support: String,
    pub tab_finance: String,
}

// O que a tela de login pode ver sem autenticação (sem a seção de e-mail)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicManifest {
    pub global: GlobalSettings,
    pub auth: AuthScreenSettings,
    pub navigation: NavigationLabels,
    pub dashboard: DashboardLabels,
    pub crm: CrmLabels,
    pub projects: ProjectLabels,
    pub tickets: TicketLabels,
    pub client_portal: ClientPortalLabels,
}

impl From<&SystemManifest> for PublicManifest {
    fn from(m: &SystemManifest) -> Self {
        Self {
            global: m.global.clone(),
            auth: m.auth.clone(),
            navigation: m.navigation.clone(),
            dashboard: m.dashboard.clone(),
            crm: m.crm.clone(),
            projects: m.projects.clone(),
            tickets: m.tickets.clone(),
            client_portal: m.client_portal.clone(),
        }
    }
}
