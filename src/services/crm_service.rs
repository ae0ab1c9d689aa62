// src/services/crm_service.rs

use chrono::Utc;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_id, CrmRepository, ProjectRepository, TicketRepository},
    models::{
        auth::{AccountStatus, Principal},
        crm::{
            ClientDetail, CreateCustomerPayload, Customer, CustomerListQuery,
            CustomerListResponse, UpdateCustomerPayload,
        },
        projects::ProjectWithFinancials,
    },
    services::{
        audit_service::{AuditService, NOTHING},
        auth::hash_password,
        finance_service::{bounded_money, project_financials},
    },
};

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
    project_repo: ProjectRepository,
    ticket_repo: TicketRepository,
    audit: AuditService,
    bcrypt_cost: u32,
}

impl CrmService {
    pub fn new(
        repo: CrmRepository,
        project_repo: ProjectRepository,
        ticket_repo: TicketRepository,
        audit: AuditService,
        bcrypt_cost: u32,
    ) -> Self {
        Self { repo, project_repo, ticket_repo, audit, bcrypt_cost }
    }

    // =========================================================================
    //  1. LISTAGEM / BUSCA
    // =========================================================================

    pub async fn list(&self, query: &CustomerListQuery) -> CustomerListResponse {
        let needle = query
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let items = self
            .repo
            .list()
            .await
            .into_iter()
            .filter(|c| query.account_status.is_none_or(|s| c.account_status == s))
            .filter(|c| match &needle {
                Some(q) => c.name.to_lowercase().contains(q) || c.company.to_lowercase().contains(q),
                None => true,
            })
            .collect();

        CustomerListResponse {
            items,
            pending_approvals: self.repo.count_pending().await,
        }
    }

    pub async fn get(&self, id: &str) -> Result<Customer, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))
    }

    // Ficha do cliente: cadastro + projetos com números + chamados
    pub async fn detail(&self, id: &str) -> Result<ClientDetail, AppError> {
        let customer = self.get(id).await?;
        let projects = self
            .project_repo
            .list_by_client(id)
            .await
            .into_iter()
            .map(|p| project_financials(&p).map(|financials| ProjectWithFinancials { financials, project: p }))
            .collect::<Result<Vec<_>, AppError>>()?;
        let tickets = self.ticket_repo.list_by_client(id).await;

        Ok(ClientDetail { customer, projects, tickets })
    }

    // =========================================================================
    //  2. ESCRITA
    // =========================================================================

    /// Cadastro feito pela equipe: já nasce aprovado e atribuído a quem cadastrou
    pub async fn create(
        &self,
        actor: &Principal,
        payload: CreateCustomerPayload,
    ) -> Result<Customer, AppError> {
        payload.validate()?;
        let total_price = bounded_money(payload.total_price)?;

        let email = payload.email.trim().to_lowercase();
        if self.repo.email_taken(&email, None).await {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = match payload.password.as_deref().filter(|p| !p.is_empty()) {
            Some(pwd) => Some(hash_password(pwd, self.bcrypt_cost).await?),
            None => None,
        };

        let customer = self
            .repo
            .create(Customer {
                id: new_id("cust"),
                name: payload.name.trim().to_string(),
                company: payload.company.trim().to_string(),
                email,
                phone: payload.phone,
                status: payload.status,
                account_status: AccountStatus::Approved,
                lifetime_value: Default::default(),
                total_price,
                paid_amount: Default::default(),
                last_contact: Utc::now().date_naive(),
                assigned_to: actor.id.clone(),
                password_hash,
                description: payload.description,
                industry: payload.industry,
            })
            .await?;

        tracing::info!("✅ Cliente {} criado por {}", customer.id, actor.email);
        Ok(customer)
    }

    pub async fn update(&self, id: &str, payload: UpdateCustomerPayload) -> Result<Customer, AppError> {
        payload.validate()?;
        let lifetime_value = payload.lifetime_value.map(bounded_money).transpose()?;
        let total_price = payload.total_price.map(bounded_money).transpose()?;
        let paid_amount = payload.paid_amount.map(bounded_money).transpose()?;

        let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());
        let updated = self
            .repo
            .update_with_unique_email(id, email.as_deref(), |c| {
                if let Some(v) = payload.name { c.name = v.trim().to_string(); }
                if let Some(v) = payload.company { c.company = v.trim().to_string(); }
                if let Some(v) = email.clone() { c.email = v; }
                if let Some(v) = payload.phone { c.phone = v; }
                if let Some(v) = payload.status { c.status = v; }
                if let Some(v) = payload.account_status { c.account_status = v; }
                if let Some(v) = lifetime_value { c.lifetime_value = v; }
                if let Some(v) = total_price { c.total_price = v; }
                if let Some(v) = paid_amount { c.paid_amount = v; }
                if let Some(v) = payload.last_contact { c.last_contact = v; }
                if let Some(v) = payload.assigned_to { c.assigned_to = v; }
                if let Some(v) = payload.industry { c.industry = Some(v); }
                if let Some(v) = payload.description { c.description = Some(v); }
                Ok(c.clone())
            })
            .await?;

        tracing::info!("✏️ Cliente {} atualizado", id);
        Ok(updated)
    }

    // Aprovação / rejeição do acesso ao portal
    pub async fn set_account_status(&self, id: &str, status: AccountStatus) -> Result<Customer, AppError> {
        let updated = self
            .repo
            .update(id, |c| {
                c.account_status = status;
                Ok(c.clone())
            })
            .await?;

        tracing::info!("🔐 Conta do cliente {} agora {:?}", id, status);
        Ok(updated)
    }

    /// Remove o cliente junto com seus projetos e chamados
    pub async fn delete(&self, actor: &Principal, id: &str) -> Result<(), AppError> {
        let removed = self.repo.delete_cascade(id).await?;

        self.audit.log_action(actor, Some(&removed.customer), NOTHING).await?;
        tracing::info!(
            "🗑️ Cliente {} removido ({} projetos, {} chamados)",
            id,
            removed.projects_removed,
            removed.tickets_removed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        db::{new_store, seed::seed_workspace, AuditRepository, Store},
        models::{
            crm::CustomerStatus,
            projects::{PaymentRates, Project, ProjectStatus},
        },
        services::finance_service::VAT_RATE,
    };

    fn setup() -> (CrmService, Store, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        let store = new_store(ws);
        let svc = CrmService::new(
            CrmRepository::new(store.clone()),
            ProjectRepository::new(store.clone()),
            TicketRepository::new(store.clone()),
            AuditService::new(AuditRepository::new(store.clone())),
            4,
        );
        (svc, store, admin)
    }

    fn new_customer(email: &str) -> CreateCustomerPayload {
        CreateCustomerPayload {
            name: "Maria Saleh".to_string(),
            company: "Saleh Logistics".to_string(),
            email: email.to_string(),
            phone: String::new(),
            status: CustomerStatus::Lead,
            total_price: Decimal::from(5000),
            password: None,
            industry: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn search_filters_by_text_and_account_status() {
        let (crm, _, _) = setup();

        let all = crm.list(&CustomerListQuery::default()).await;
        assert_eq!(all.items.len(), 2);
        assert_eq!(all.pending_approvals, 1);

        let by_company = crm
            .list(&CustomerListQuery { q: Some("global tech".to_string()), account_status: None })
            .await;
        assert_eq!(by_company.items.len(), 1);
        assert_eq!(by_company.items[0].id, "cust-2");

        let approved = crm
            .list(&CustomerListQuery { q: None, account_status: Some(AccountStatus::Approved) })
            .await;
        assert_eq!(approved.items.len(), 1);
        assert_eq!(approved.items[0].id, "c-1");
    }

    #[tokio::test]
    async fn staff_created_customer_is_approved_and_assigned() {
        let (crm, _, admin) = setup();
        let c = crm.create(&admin, new_customer("Maria@Saleh.sa")).await.unwrap();
        assert_eq!(c.account_status, AccountStatus::Approved);
        assert_eq!(c.assigned_to, "u-admin");
        assert_eq!(c.email, "maria@saleh.sa");

        let dup = crm.create(&admin, new_customer("MARIA@saleh.sa")).await.unwrap_err();
        assert!(matches!(dup, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn update_rejects_email_of_other_customer() {
        let (crm, _, _) = setup();
        let err = crm
            .update("cust-2", UpdateCustomerPayload { email: Some("s.jenkins@acme.inc".to_string()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));

        let same = crm
            .update("c-1", UpdateCustomerPayload { email: Some("s.jenkins@acme.inc".to_string()), ..Default::default() })
            .await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn approving_an_account() {
        let (crm, _, _) = setup();
        let c = crm.set_account_status("cust-2", AccountStatus::Approved).await.unwrap();
        assert_eq!(c.account_status, AccountStatus::Approved);
        assert_eq!(crm.list(&CustomerListQuery::default()).await.pending_approvals, 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_projects_and_tickets() {
        let (crm, store, admin) = setup();
        store.write().await.projects.push(Project {
            id: "PRJ-1001".to_string(),
            name: "Hardening".to_string(),
            description: String::new(),
            client_id: "c-1".to_string(),
            admin_ids: vec![],
            value: Decimal::from(1000),
            costs: Decimal::ZERO,
            award_ref: String::new(),
            invoice_ref: String::new(),
            tax_rate: VAT_RATE,
            payment_rates: PaymentRates::default(),
            payments: vec![],
            expected_collections: vec![],
            guarantees: String::new(),
            financial_notes: String::new(),
            status: ProjectStatus::Planning,
            created_at: Utc::now(),
            start_date: None,
            end_date: None,
            tasks: vec![],
            attachments: vec![],
            service_ids: vec![],
        });

        let detail = crm.detail("c-1").await.unwrap();
        assert_eq!(detail.projects.len(), 1);
        assert_eq!(detail.tickets.len(), 1);

        crm.delete(&admin, "c-1").await.unwrap();

        let ws = store.read().await;
        assert!(ws.customers.iter().all(|c| c.id != "c-1"));
        assert!(ws.projects.is_empty());
        assert!(ws.tickets.is_empty());
        assert_eq!(ws.audit_logs.len(), 1);
        assert!(ws.audit_logs[0].after_change.is_none());
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let (crm, _, admin) = setup();
        assert!(matches!(crm.detail("nope").await.unwrap_err(), AppError::CustomerNotFound(_)));
        assert!(matches!(crm.delete(&admin, "nope").await.unwrap_err(), AppError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn blank_or_oversized_input_is_rejected() {
        let (crm, store, admin) = setup();

        let mut blank = new_customer("blank@saleh.sa");
        blank.company = "   ".to_string();
        assert!(matches!(crm.create(&admin, blank).await.unwrap_err(), AppError::ValidationError(_)));

        let mut huge = new_customer("huge@saleh.sa");
        huge.total_price = Decimal::MAX;
        assert!(matches!(crm.create(&admin, huge).await.unwrap_err(), AppError::AmountOutOfRange));

        let err = crm
            .update("c-1", UpdateCustomerPayload { paid_amount: Some(Decimal::MAX), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
        assert_eq!(store.read().await.customers.len(), 2);
        assert_eq!(crm.get("c-1").await.unwrap().paid_amount, Decimal::from(8500));
    }

    #[tokio::test]
    async fn concurrent_email_changes_leave_one_owner() {
        let (crm, store, _) = setup();
        let target = || UpdateCustomerPayload { email: Some("shared@acme.inc".to_string()), ..Default::default() };

        let (a, b) = tokio::join!(crm.update("c-1", target()), crm.update("cust-2", target()));
        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), AppError::EmailAlreadyExists));

        let ws = store.read().await;
        assert_eq!(ws.customers.iter().filter(|c| c.email == "shared@acme.inc").count(), 1);
    }
}
