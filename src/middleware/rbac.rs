// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::rbac::{CrudAction, ViewType},
    services::rbac_service::can_access,
};

/// 1. O Trait que define o que é uma Permissão: tela + ação
pub trait PermissionDef: Send + Sync + 'static {
    fn view() -> ViewType;
    fn action() -> CrudAction;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        // A. Extrai Usuário (colocado pelo auth_guard)
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        // B. Aplica a política
        if !can_access(&user.0, T::view(), T::action()) {
            tracing::warn!(
                "⛔ {} sem permissão {:?}/{:?}",
                user.0.email,
                T::view(),
                T::action()
            );
            let required = format!("{:?}:{:?}", T::view(), T::action()).to_uppercase();
            return Err(AppError::Forbidden(required).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $view:ident, $action:ident) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn view() -> ViewType { ViewType::$view }
            fn action() -> CrudAction { CrudAction::$action }
        }
    };
}

permission!(PermDashboardView, Dashboard, View);

permission!(PermCrmView, Crm, View);
permission!(PermClientDetailView, ClientDetail, View);
permission!(PermCrmCreate, Crm, Create);
permission!(PermCrmEdit, Crm, Edit);
permission!(PermCrmDelete, Crm, Delete);

permission!(PermProjectsView, ProjectPipeline, View);
permission!(PermProjectsCreate, ProjectCreate, Create);
permission!(PermProjectsEdit, ProjectPipeline, Edit);

permission!(PermFinanceView, FinancialPipeline, View);

permission!(PermTicketsView, Tickets, View);
permission!(PermTicketsEdit, Tickets, Edit);

permission!(PermServicesView, ServicesCatalog, View);
permission!(PermServicesCreate, ServicesCatalog, Create);
permission!(PermServicesEdit, ServicesCatalog, Edit);
permission!(PermServicesDelete, ServicesCatalog, Delete);

permission!(PermStaffView, AdminMgmt, View);
permission!(PermStaffCreate, AdminMgmt, Create);
permission!(PermStaffEdit, StaffEdit, Edit);
permission!(PermStaffDelete, AdminMgmt, Delete);

permission!(PermAuditView, AuditLog, View);

permission!(PermSettingsView, Settings, View);
permission!(PermPortal, ClientPortal, View);
