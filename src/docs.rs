// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,

        // --- Settings ---
        handlers::settings::get_public_manifest,
        handlers::settings::get_manifest,
        handlers::settings::update_manifest,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_charts,
        handlers::dashboard::get_activity,

        // --- CRM ---
        handlers::crm::list_customers,
        handlers::crm::get_customer,
        handlers::crm::create_customer,
        handlers::crm::update_customer,
        handlers::crm::set_account_status,
        handlers::crm::delete_customer,

        // --- PROJECTS ---
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::get_project_financials,
        handlers::projects::add_payment,
        handlers::projects::add_expected_collection,
        handlers::projects::add_task,
        handlers::projects::update_task,
        handlers::projects::delete_task,
        handlers::projects::add_attachment,

        // --- Financials ---
        handlers::finance::get_pipeline,
        handlers::finance::get_quarterly,

        // --- Tickets ---
        handlers::tickets::list_tickets,
        handlers::tickets::get_ticket,
        handlers::tickets::update_status,
        handlers::tickets::reply,

        // --- Services ---
        handlers::catalog::list_services,
        handlers::catalog::get_service,
        handlers::catalog::create_service,
        handlers::catalog::update_service,
        handlers::catalog::delete_service,

        // --- Staff ---
        handlers::staff::list_staff,
        handlers::staff::get_staff,
        handlers::staff::create_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,

        // --- Audit ---
        handlers::audit::list_audit_logs,

        // --- Portal ---
        handlers::portal::get_overview,
        handlers::portal::list_tickets,
        handlers::portal::create_ticket,
        handlers::portal::reply_ticket,
        handlers::portal::make_payment,
    ),
    components(
        schemas(
            // --- RBAC ---
            models::rbac::ViewType,
            models::rbac::CrudAction,
            models::rbac::CrudPermissions,
            models::rbac::ProjectAccess,
            models::rbac::AllProjects,

            // --- Auth ---
            models::auth::UserRole,
            models::auth::AccountStatus,
            models::auth::User,
            models::auth::Principal,
            models::auth::LoginMode,
            models::auth::LoginUserPayload,
            models::auth::RegisterClientPayload,
            models::auth::AuthResponse,
            models::auth::RegistrationResponse,
            models::auth::UpdateProfilePayload,

            // --- CRM ---
            models::crm::CustomerStatus,
            models::crm::Customer,
            models::crm::CreateCustomerPayload,
            models::crm::UpdateCustomerPayload,
            models::crm::AccountStatusPayload,
            models::crm::CustomerListResponse,
            models::crm::ClientDetail,

            // --- Attachments ---
            models::attachment::Attachment,
            models::attachment::AttachmentPayload,

            // --- Projects ---
            models::projects::ProjectStatus,
            models::projects::TaskStatus,
            models::projects::PaymentType,
            models::projects::ProjectTask,
            models::projects::ProjectPayment,
            models::projects::ExpectedCollection,
            models::projects::PaymentRates,
            models::projects::Project,
            models::projects::ProjectWithFinancials,
            models::projects::CreateProjectPayload,
            models::projects::UpdateProjectPayload,
            models::projects::AddPaymentPayload,
            models::projects::AddExpectedCollectionPayload,
            models::projects::AddTaskPayload,
            models::projects::UpdateTaskPayload,

            // --- Finance ---
            models::finance::ProjectFinancials,
            models::finance::AccountingTotals,
            models::finance::FinancialRow,
            models::finance::FinancialPipeline,
            models::finance::QuarterBucket,
            models::finance::ClientBalance,

            // --- Tickets ---
            models::tickets::TicketStatus,
            models::tickets::TicketPriority,
            models::tickets::Message,
            models::tickets::Ticket,
            models::tickets::CreateTicketPayload,
            models::tickets::ReplyPayload,
            models::tickets::UpdateTicketStatusPayload,

            // --- Services ---
            models::catalog::Service,
            models::catalog::CreateServicePayload,
            models::catalog::UpdateServicePayload,

            // --- Staff ---
            models::staff::CreateStaffPayload,
            models::staff::UpdateStaffPayload,

            // --- Audit ---
            models::audit::AuditLog,

            // --- Settings ---
            models::settings::SystemManifest,
            models::settings::GlobalSettings,
            models::settings::AuthScreenSettings,
            models::settings::EmailProvider,
            models::settings::Encryption,
            models::settings::EmailAuth,
            models::settings::EmailSettings,
            models::settings::NavigationLabels,
            models::settings::DashboardLabels,
            models::settings::CrmLabels,
            models::settings::ProjectLabels,
            models::settings::TicketLabels,
            models::settings::ClientPortalLabels,
            models::settings::PublicManifest,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::MonthlyTrendEntry,
            models::dashboard::TicketLoadEntry,
            models::dashboard::ProjectHealthEntry,
            models::dashboard::DashboardCharts,
            models::dashboard::DashboardActivity,

            // --- Portal ---
            models::portal::PortalOverview,
            models::portal::MakePaymentPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login da equipe e do cliente, cadastro de cliente"),
        (name = "Users", description = "Perfil do usuário logado"),
        (name = "Settings", description = "Manifesto do sistema: marca, e-mail e rótulos"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais"),
        (name = "CRM", description = "Carteira de clientes e aprovação de contas"),
        (name = "Projects", description = "Pipeline de projetos, tarefas e recebimentos"),
        (name = "Financials", description = "Visão contábil com IVA"),
        (name = "Tickets", description = "Fila do suporte"),
        (name = "Services", description = "Catálogo de serviços"),
        (name = "Staff", description = "Colaboradores e permissões"),
        (name = "Audit", description = "Trilha de auditoria"),
        (name = "Client Portal", description = "Área do cliente")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
