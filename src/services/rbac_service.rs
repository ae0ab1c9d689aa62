// src/services/rbac_service.rs

use crate::models::{
    auth::{Principal, UserRole},
    rbac::{CrudAction, ViewType},
};

/// A política de acesso por tela + ação.
///
/// - administrador raiz passa sempre;
/// - cliente só enxerga o portal e as configurações;
/// - configurações (perfil) sempre liberadas;
/// - telas filhas exigem a tela mãe na lista de permissões;
/// - ações além de "ver" exigem papel ADMIN ou o flag CRUD correspondente.
pub fn can_access(principal: &Principal, view: ViewType, action: CrudAction) -> bool {
    if principal.is_root_admin() {
        return true;
    }

    if principal.is_client() {
        return matches!(view, ViewType::ClientPortal | ViewType::Settings);
    }

    if view == ViewType::Settings {
        return true;
    }

    let required = view.parent();
    if !principal.permissions.contains(&required) {
        return false;
    }

    if principal.role == UserRole::Admin {
        return true;
    }

    match principal.crud_permissions.get(&required) {
        Some(crud) => crud.allows(action),
        // Tela liberada sem mapa CRUD: só leitura
        None => action == CrudAction::View,
    }
}

/// Primeira tela depois do login
pub fn landing_view(principal: &Principal) -> ViewType {
    if principal.is_client() {
        ViewType::ClientPortal
    } else if principal.is_admin() || principal.permissions.contains(&ViewType::Dashboard) {
        ViewType::Dashboard
    } else {
        ViewType::Settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::models::{
        auth::AccountStatus,
        rbac::{CrudPermissions, ProjectAccess},
    };

    fn staff(id: &str, role: UserRole, permissions: Vec<ViewType>) -> Principal {
        Principal {
            id: id.to_string(),
            name: "Teste".to_string(),
            email: format!("{id}@securelogx.com"),
            role,
            status: AccountStatus::Approved,
            avatar: None,
            company: None,
            permissions,
            crud_permissions: BTreeMap::new(),
            project_access: ProjectAccess::all(),
        }
    }

    #[test]
    fn root_admin_bypasses_everything() {
        let root = staff("u-admin", UserRole::Staff, vec![]);
        assert!(can_access(&root, ViewType::AuditLog, CrudAction::Delete));
    }

    #[test]
    fn clients_only_reach_portal_and_settings() {
        let mut client = staff("c-1", UserRole::Client, vec![ViewType::Crm]);
        client.crud_permissions.insert(ViewType::Crm, CrudPermissions { view: true, create: true, edit: true, delete: true });
        assert!(can_access(&client, ViewType::ClientPortal, CrudAction::Create));
        assert!(can_access(&client, ViewType::Settings, CrudAction::Edit));
        assert!(!can_access(&client, ViewType::Crm, CrudAction::View));
    }

    #[test]
    fn settings_is_always_reachable_for_staff() {
        let s = staff("u-9", UserRole::Staff, vec![]);
        assert!(can_access(&s, ViewType::Settings, CrudAction::Edit));
        assert!(!can_access(&s, ViewType::Dashboard, CrudAction::View));
    }

    #[test]
    fn child_views_need_parent_permission() {
        let s = staff("u-9", UserRole::Staff, vec![ViewType::Crm]);
        assert!(can_access(&s, ViewType::ClientDetail, CrudAction::View));
        assert!(!can_access(&s, ViewType::StaffEdit, CrudAction::View));

        let a = staff("u-8", UserRole::Admin, vec![ViewType::AdminMgmt]);
        assert!(can_access(&a, ViewType::StaffEdit, CrudAction::Edit));
    }

    #[test]
    fn non_view_actions_follow_crud_flags() {
        let mut s = staff("u-2", UserRole::Staff, vec![ViewType::Tickets]);
        assert!(can_access(&s, ViewType::Tickets, CrudAction::View));
        assert!(!can_access(&s, ViewType::Tickets, CrudAction::Edit));

        s.crud_permissions.insert(ViewType::Tickets, CrudPermissions { view: true, create: false, edit: true, delete: false });
        assert!(can_access(&s, ViewType::Tickets, CrudAction::Edit));
        assert!(!can_access(&s, ViewType::Tickets, CrudAction::Delete));
    }

    #[test]
    fn admin_role_skips_crud_flags_but_not_view_list() {
        let a = staff("u-7", UserRole::Admin, vec![ViewType::Crm]);
        assert!(can_access(&a, ViewType::Crm, CrudAction::Delete));
        assert!(!can_access(&a, ViewType::ProjectPipeline, CrudAction::View));
    }

    #[test]
    fn landing_view_depends_on_role_and_dashboard() {
        assert_eq!(landing_view(&staff("c-1", UserRole::Client, vec![])), ViewType::ClientPortal);
        assert_eq!(landing_view(&staff("u-7", UserRole::Admin, vec![])), ViewType::Dashboard);
        assert_eq!(landing_view(&staff("u-2", UserRole::Staff, vec![ViewType::Dashboard])), ViewType::Dashboard);
        assert_eq!(landing_view(&staff("u-3", UserRole::Staff, vec![ViewType::Tickets])), ViewType::Settings);
    }
}
