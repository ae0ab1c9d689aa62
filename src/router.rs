// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas (login, cadastro e marca da tela de entrada)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me).put(handlers::auth::update_me));

    let settings_routes = Router::new()
        .route("/manifest"
               ,get(handlers::settings::get_manifest)
               .put(handlers::settings::update_manifest)
        );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/charts", get(handlers::dashboard::get_charts))
        .route("/activity", get(handlers::dashboard::get_activity));

    let crm_routes = Router::new()
        .route("/customers"
               ,post(handlers::crm::create_customer)
               .get(handlers::crm::list_customers)
        )
        .route("/customers/{id}"
               ,get(handlers::crm::get_customer)
               .patch(handlers::crm::update_customer)
               .delete(handlers::crm::delete_customer)
        )
        .route("/customers/{id}/account-status", put(handlers::crm::set_account_status));

    let project_routes = Router::new()
        .route("/"
               ,post(handlers::projects::create_project)
               .get(handlers::projects::list_projects)
        )
        .route("/{id}"
               ,get(handlers::projects::get_project)
               .patch(handlers::projects::update_project)
        )
        .route("/{id}/financials", get(handlers::projects::get_project_financials))
        .route("/{id}/payments", post(handlers::projects::add_payment))
        .route("/{id}/expected-collections", post(handlers::projects::add_expected_collection))
        .route("/{id}/tasks", post(handlers::projects::add_task))
        .route("/{id}/tasks/{task_id}"
               ,patch(handlers::projects::update_task)
               .delete(handlers::projects::delete_task)
        )
        .route("/{id}/attachments", post(handlers::projects::add_attachment));

    let finance_routes = Router::new()
        .route("/", get(handlers::finance::get_pipeline))
        .route("/quarterly", get(handlers::finance::get_quarterly));

    let ticket_routes = Router::new()
        .route("/", get(handlers::tickets::list_tickets))
        .route("/{id}", get(handlers::tickets::get_ticket))
        .route("/{id}/status", put(handlers::tickets::update_status))
        .route("/{id}/messages", post(handlers::tickets::reply));

    let service_routes = Router::new()
        .route("/"
               ,post(handlers::catalog::create_service)
               .get(handlers::catalog::list_services)
        )
        .route("/{id}"
               ,get(handlers::catalog::get_service)
               .patch(handlers::catalog::update_service)
               .delete(handlers::catalog::delete_service)
        );

    let staff_routes = Router::new()
        .route("/"
               ,post(handlers::staff::create_staff)
               .get(handlers::staff::list_staff)
        )
        .route("/{id}"
               ,get(handlers::staff::get_staff)
               .patch(handlers::staff::update_staff)
               .delete(handlers::staff::delete_staff)
        );

    let portal_routes = Router::new()
        .route("/", get(handlers::portal::get_overview))
        .route("/tickets"
               ,post(handlers::portal::create_ticket)
               .get(handlers::portal::list_tickets)
        )
        .route("/tickets/{id}/messages", post(handlers::portal::reply_ticket))
        .route("/payments", post(handlers::portal::make_payment));

    // Tudo abaixo passa pelo auth_guard
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/crm", crm_routes)
        .nest("/api/projects", project_routes)
        .nest("/api/financials", finance_routes)
        .nest("/api/tickets", ticket_routes)
        .nest("/api/services", service_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/portal", portal_routes)
        .route("/api/audit", get(handlers::audit::list_audit_logs))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/manifest/public", get(handlers::settings::get_public_manifest))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state)
}
