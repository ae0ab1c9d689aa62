// src/db/seed.rs

use std::collections::BTreeMap;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::db::db::{Sequences, Workspace};
use crate::models::{
    auth::{AccountStatus, User, UserRole, ROOT_ADMIN_ID},
    catalog::Service,
    crm::{Customer, CustomerStatus},
    rbac::{CrudPermissions, ProjectAccess, ViewType},
    settings::*,
    tickets::{Message, Ticket, TicketPriority, TicketStatus},
};

// Telas liberadas para o administrador raiz
const ALL_VIEWS: &[ViewType] = &[
    ViewType::Dashboard,
    ViewType::Crm,
    ViewType::ProjectPipeline,
    ViewType::FinancialPipeline,
    ViewType::Tickets,
    ViewType::Settings,
];

fn date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("data inválida na semente: {s}"))
}

fn timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("timestamp inválido na semente: {s}"))?
        .with_timezone(&Utc))
}

/// Monta o estado inicial. As senhas da semente são hasheadas com `bcrypt_cost`.
pub fn seed_workspace(bcrypt_cost: u32) -> anyhow::Result<Workspace> {
    let hash = |plain: &str| -> anyhow::Result<Option<String>> {
        Ok(Some(bcrypt::hash(plain, bcrypt_cost).context("falha ao hashear senha da semente")?))
    };

    let users = vec![
        User {
            id: ROOT_ADMIN_ID.to_string(),
            name: "Securelogx Admin".to_string(),
            email: "admin@securelogx.com".to_string(),
            role: UserRole::Admin,
            status: AccountStatus::Approved,
            avatar: Some("https://picsum.photos/seed/admin/100/100".to_string()),
            company: None,
            password_hash: hash("P@ssw0rd")?,
            mfa_enabled: false,
            permissions: ALL_VIEWS.to_vec(),
            crud_permissions: BTreeMap::new(),
            project_access: ProjectAccess::all(),
        },
        User {
            id: "u-2".to_string(),
            name: "Sarah Kim".to_string(),
            email: "sarah.k@securelogx.com".to_string(),
            role: UserRole::Staff,
            status: AccountStatus::Approved,
            avatar: Some("https://picsum.photos/seed/sarahk/100/100".to_string()),
            company: None,
            password_hash: hash("password123")?,
            mfa_enabled: false,
            permissions: vec![ViewType::Dashboard, ViewType::Tickets, ViewType::Settings],
            crud_permissions: BTreeMap::from([
                (ViewType::Dashboard, CrudPermissions::DEFAULT),
                (ViewType::Tickets, CrudPermissions { view: true, create: false, edit: true, delete: false }),
            ]),
            project_access: ProjectAccess::all(),
        },
    ];

    let customers = vec![
        Customer {
            id: "c-1".to_string(),
            name: "Sarah Jenkins".to_string(),
            company: "Acme Inc.".to_string(),
            email: "s.jenkins@acme.inc".to_string(),
            phone: "+1 555-0123".to_string(),
            status: CustomerStatus::Active,
            account_status: AccountStatus::Approved,
            lifetime_value: Decimal::from(12_500),
            total_price: Decimal::from(15_000),
            paid_amount: Decimal::from(8_500),
            last_contact: date("2024-05-10")?,
            assigned_to: ROOT_ADMIN_ID.to_string(),
            password_hash: hash("clientpassword")?,
            description: None,
            industry: None,
        },
        Customer {
            id: "cust-2".to_string(),
            name: "Michael Chen".to_string(),
            company: "Global Tech Solutions".to_string(),
            email: "m.chen@globaltech.com".to_string(),
            phone: "+1 555-9876".to_string(),
            status: CustomerStatus::Prospect,
            account_status: AccountStatus::Pending,
            lifetime_value: Decimal::ZERO,
            total_price: Decimal::from(5_000),
            paid_amount: Decimal::ZERO,
            last_contact: date("2024-05-12")?,
            assigned_to: ROOT_ADMIN_ID.to_string(),
            password_hash: None,
            description: None,
            industry: None,
        },
    ];

    let opened_at = timestamp("2024-05-14T10:00:00Z")?;
    let first_text = "Every time I try to click on the billing tab, the page refreshes and logs me out.";
    let tickets = vec![Ticket {
        id: "TKT-1001".to_string(),
        client_id: "c-1".to_string(),
        client_name: "Sarah Jenkins".to_string(),
        client_company: Some("Acme Inc.".to_string()),
        project_id: None,
        subject: "Cannot access billing dashboard".to_string(),
        description: first_text.to_string(),
        status: TicketStatus::Open,
        priority: TicketPriority::High,
        category: "Billing".to_string(),
        created_at: opened_at,
        updated_at: opened_at,
        messages: vec![Message {
            id: "m-1".to_string(),
            sender_id: "c-1".to_string(),
            sender_name: "Sarah Jenkins".to_string(),
            text: first_text.to_string(),
            timestamp: opened_at,
            is_admin: false,
            attachments: Vec::new(),
        }],
    }];

    let services = vec![
        Service {
            id: "srv-1".to_string(),
            name: "Infrastructure Audit".to_string(),
            description: "Comprehensive security and network assessment.".to_string(),
            base_price: Decimal::from(5_000),
        },
        Service {
            id: "srv-2".to_string(),
            name: "Cloud Migration".to_string(),
            description: "Deployment of local systems to encrypted cloud clusters.".to_string(),
            base_price: Decimal::from(12_000),
        },
        Service {
            id: "srv-3".to_string(),
            name: "Endpoint Protection".to_string(),
            description: "256-AES encryption layer deployment across all endpoints.".to_string(),
            base_price: Decimal::from(3_500),
        },
    ];

    Ok(Workspace {
        users,
        customers,
        projects: Vec::new(),
        tickets,
        services,
        audit_logs: Vec::new(),
        manifest: initial_manifest(),
        sequences: Sequences { last_project: 1000, last_ticket: 1001 },
    })
}

pub fn initial_manifest() -> SystemManifest {
    let s = |v: &str| v.to_string();
    SystemManifest {
        global: GlobalSettings {
            logo_url: s(""),
            primary_color: s("#006B35"),
            site_title: s("SX MGMT"),
            currency: s("SAR"),
            logo_width: 120,
            logo_height: 32,
        },
        auth: AuthScreenSettings {
            login_title: s(""),
            login_subtitle: s(""),
            banner_url: s(""),
            login_bg_color: s("#1A1A1A"),
            login_bg_image_url: s(""),
            terms_content: s("By accessing this platform, you agree to comply with our infrastructure security protocols and confidentiality requirements. All actions are logged."),
            privacy_content: s("Securelogx Co. ensures end-to-end data encryption. Your project data and identity remain stored in secured local systems according to high-security standards."),
        },
        email: EmailSettings {
            provider: EmailProvider::Smtp,
            host: s("smtp.securelogx.com"),
            port: 587,
            encryption: Encryption::Tls,
            auth: EmailAuth { user: s("notifications@securelogx.com"), pass: s("") },
            from_email: s("no-reply@securelogx.com"),
            from_name: s("SX Support Desk"),
            notifications_enabled: true,
            incoming_enabled: false,
            incoming_host: s("imap.securelogx.com"),
            incoming_port: 993,
            incoming_encryption: Encryption::Ssl,
            incoming_user: s("support@securelogx.com"),
            incoming_pass: s(""),
            fetch_interval: 5,
        },
        navigation: NavigationLabels {
            dashboard: s("Insights"),
            crm: s("Client Registry"),
            projects: s("Project Pipeline"),
            financials: s("Financials"),
            tickets: s("Support Queue"),
            admin: s("Staff Mgmt"),
            settings: s("Settings"),
            services: s("Services"),
            audit: s("Audit Registry"),
        },
        dashboard: DashboardLabels {
            title: s("Executive Intelligence"),
            subtitle: s("Consolidated monitoring of Securelogx infrastructure performance."),
            stat1: s("Pipeline Value"),
            stat2: s("Collected Liquidity"),
            stat3: s("Support Load"),
            stat4: s("Operations"),
        },
        crm: CrmLabels {
            title: s("Client Registry"),
            subtitle: s("Manage client identities and account approvals."),
            register_button: s("Register New Client"),
        },
        projects: ProjectLabels {
            title: s("Project Management"),
            subtitle: s("Manage leads and detailed active project lifecycles."),
            stage1: s("Lead"),
            stage2: s("Prospect"),
            stage3: s("Active"),
            stage4: s("Churned"),
        },
        tickets: TicketLabels {
            title: s("Support Desk"),
            priority_urgent: s("Urgent"),
            priority_high: s("High"),
            priority_medium: s("Medium"),
            priority_low: s("Low"),
        },
        client_portal: ClientPortalLabels {
            title: s("Client Hub"),
            welcome_message: s("Portal secured by Securelogx Co."),
            tab_support: s("Support"),
            tab_finance: s("Finance"),
        },
    }
}
