// src/services/project_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_id, ProjectRepository},
    models::{
        auth::Principal,
        finance::ProjectFinancials,
        projects::{
            AddAttachmentPayload, AddExpectedCollectionPayload, AddPaymentPayload, AddTaskPayload,
            CreateProjectPayload, ExpectedCollection, PaymentRates, Project, ProjectPayment,
            ProjectTask, ProjectWithFinancials, TaskStatus, UpdateProjectPayload,
            UpdateTaskPayload,
        },
    },
    services::{
        audit_service::{AuditService, NOTHING},
        finance_service::{bounded_money, project_financials, VAT_RATE},
    },
};

const DEFAULT_PAYMENT_NOTE: &str = "Progress collection";

fn with_financials(project: Project) -> Result<ProjectWithFinancials, AppError> {
    Ok(ProjectWithFinancials { financials: project_financials(&project)?, project })
}

// Grava `next` no lugar de `current` só se os números continuarem calculáveis
fn commit(current: &mut Project, next: Project) -> Result<ProjectWithFinancials, AppError> {
    let checked = with_financials(next)?;
    *current = checked.project.clone();
    Ok(checked)
}

fn new_task(title: &str, due_date: Option<chrono::NaiveDate>) -> Option<ProjectTask> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some(ProjectTask {
        id: new_id("task"),
        title: title.to_string(),
        status: TaskStatus::Todo,
        due_date,
    })
}

#[derive(Clone)]
pub struct ProjectService {
    repo: ProjectRepository,
    audit: AuditService,
}

impl ProjectService {
    pub fn new(repo: ProjectRepository, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    fn ensure_access(actor: &Principal, project_id: &str) -> Result<(), AppError> {
        if actor.is_root_admin() || actor.project_access.allows(project_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("PROJECT_ACCESS:{project_id}")))
        }
    }

    // =========================================================================
    //  1. LEITURA
    // =========================================================================

    /// Só os projetos liberados para o colaborador
    pub async fn list(&self, actor: &Principal) -> Result<Vec<ProjectWithFinancials>, AppError> {
        self.repo
            .list()
            .await
            .into_iter()
            .filter(|p| actor.is_root_admin() || actor.project_access.allows(&p.id))
            .map(with_financials)
            .collect()
    }

    pub async fn get(&self, actor: &Principal, id: &str) -> Result<ProjectWithFinancials, AppError> {
        Self::ensure_access(actor, id)?;
        let project = self
            .repo
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::ProjectNotFound(id.to_string()))?;
        with_financials(project)
    }

    pub async fn financials(&self, actor: &Principal, id: &str) -> Result<ProjectFinancials, AppError> {
        Ok(self.get(actor, id).await?.financials)
    }

    // =========================================================================
    //  2. CRIAÇÃO / EDIÇÃO
    // =========================================================================

    pub async fn create(
        &self,
        actor: &Principal,
        payload: CreateProjectPayload,
    ) -> Result<ProjectWithFinancials, AppError> {
        payload.validate()?;
        let value = bounded_money(payload.value)?;
        let costs = bounded_money(payload.costs)?;

        // Sem responsáveis informados, quem criou assume o projeto
        let admin_ids = if payload.admin_ids.is_empty() {
            vec![actor.id.clone()]
        } else {
            payload.admin_ids
        };
        let tasks = payload.tasks.iter().filter_map(|t| new_task(t, None)).collect();

        let client_id = payload.client_id.trim().to_string();
        let project = self
            .repo
            .create(&client_id, |id| Project {
                id,
                name: payload.name.trim().to_string(),
                description: payload.description,
                client_id: client_id.clone(),
                admin_ids,
                value,
                costs,
                award_ref: payload.award_ref,
                invoice_ref: payload.invoice_ref,
                tax_rate: VAT_RATE,
                payment_rates: PaymentRates::default(),
                payments: Vec::new(),
                expected_collections: Vec::new(),
                guarantees: String::new(),
                financial_notes: String::new(),
                status: payload.status,
                created_at: Utc::now(),
                start_date: payload.start_date.or_else(|| Some(Utc::now().date_naive())),
                end_date: payload.end_date,
                tasks,
                attachments: Vec::new(),
                service_ids: payload.service_ids,
            })
            .await?;

        self.audit.log_action(actor, NOTHING, Some(&project)).await?;
        tracing::info!("📁 Projeto {} criado para o cliente {}", project.id, project.client_id);
        with_financials(project)
    }

    pub async fn update(
        &self,
        actor: &Principal,
        id: &str,
        payload: UpdateProjectPayload,
    ) -> Result<ProjectWithFinancials, AppError> {
        payload.validate()?;
        Self::ensure_access(actor, id)?;
        let value = payload.value.map(bounded_money).transpose()?;
        let costs = payload.costs.map(bounded_money).transpose()?;

        let project = self
            .repo
            .update(id, |p| {
                let mut next = p.clone();
                if let Some(v) = payload.name { next.name = v.trim().to_string(); }
                if let Some(v) = payload.description { next.description = v; }
                if let Some(v) = payload.admin_ids { next.admin_ids = v; }
                if let Some(v) = value { next.value = v; }
                if let Some(v) = costs { next.costs = v; }
                if let Some(v) = payload.award_ref { next.award_ref = v; }
                if let Some(v) = payload.invoice_ref { next.invoice_ref = v; }
                if let Some(v) = payload.payment_rates { next.payment_rates = v; }
                if let Some(v) = payload.guarantees { next.guarantees = v; }
                if let Some(v) = payload.financial_notes { next.financial_notes = v; }
                if let Some(v) = payload.status { next.status = v; }
                // `null` explícito limpa a data
                if let Some(v) = payload.start_date { next.start_date = v; }
                if let Some(v) = payload.end_date { next.end_date = v; }
                if let Some(v) = payload.service_ids { next.service_ids = v; }
                commit(p, next)
            })
            .await?;

        tracing::info!("✏️ Projeto {} atualizado", id);
        Ok(project)
    }

    // =========================================================================
    //  3. LIVRO DE RECEBIMENTOS
    // =========================================================================

    pub async fn add_payment(
        &self,
        actor: &Principal,
        id: &str,
        payload: AddPaymentPayload,
    ) -> Result<ProjectWithFinancials, AppError> {
        if payload.amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount);
        }
        let amount = bounded_money(payload.amount)?;
        Self::ensure_access(actor, id)?;

        let project = self
            .repo
            .update(id, |p| {
                let mut next = p.clone();
                next.payments.push(ProjectPayment {
                    id: new_id("pay"),
                    amount,
                    date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
                    note: payload
                        .note
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_PAYMENT_NOTE.to_string()),
                    payment_type: payload.payment_type,
                    invoice_ref: payload.invoice_ref,
                });
                commit(p, next)
            })
            .await?;

        let f = &project.financials;
        if f.outstanding < Decimal::ZERO {
            // Permitido, mas fica registrado
            tracing::warn!(
                "⚠️ Projeto {} recebeu {} além do contratado ({} > {})",
                id,
                -f.outstanding,
                f.total_collected,
                f.total_contract
            );
        }
        tracing::info!("💰 Recebimento de {} lançado no projeto {}", amount, id);
        Ok(project)
    }

    pub async fn add_expected_collection(
        &self,
        actor: &Principal,
        id: &str,
        payload: AddExpectedCollectionPayload,
    ) -> Result<ProjectWithFinancials, AppError> {
        if payload.amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount);
        }
        let amount = bounded_money(payload.amount)?;
        Self::ensure_access(actor, id)?;

        self.repo
            .update(id, |p| {
                let mut next = p.clone();
                next.expected_collections.push(ExpectedCollection {
                    id: new_id("exp"),
                    amount,
                    expected_date: payload.expected_date,
                    note: payload.note,
                });
                commit(p, next)
            })
            .await
    }

    // =========================================================================
    //  4. TAREFAS E ANEXOS
    // =========================================================================

    pub async fn add_task(&self, actor: &Principal, id: &str, payload: AddTaskPayload) -> Result<ProjectTask, AppError> {
        Self::ensure_access(actor, id)?;
        let task = new_task(&payload.title, payload.due_date).ok_or_else(|| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("title", validator::ValidationError::new("required"));
            AppError::ValidationError(errors)
        })?;

        self.repo
            .update(id, |p| {
                p.tasks.push(task.clone());
                Ok(())
            })
            .await?;

        Ok(task)
    }

    pub async fn update_task(
        &self,
        actor: &Principal,
        id: &str,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<ProjectTask, AppError> {
        Self::ensure_access(actor, id)?;
        self.repo
            .update(id, |p| {
                let task = p
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == task_id)
                    .ok_or_else(|| AppError::TaskNotFound(task_id.to_string()))?;
                task.status = payload.status;
                Ok(task.clone())
            })
            .await
    }

    pub async fn delete_task(&self, actor: &Principal, id: &str, task_id: &str) -> Result<(), AppError> {
        Self::ensure_access(actor, id)?;
        self.repo
            .update(id, |p| {
                let pos = p
                    .tasks
                    .iter()
                    .position(|t| t.id == task_id)
                    .ok_or_else(|| AppError::TaskNotFound(task_id.to_string()))?;
                p.tasks.remove(pos);
                Ok(())
            })
            .await
    }

    pub async fn add_attachment(
        &self,
        actor: &Principal,
        id: &str,
        payload: AddAttachmentPayload,
    ) -> Result<ProjectWithFinancials, AppError> {
        payload.validate()?;
        Self::ensure_access(actor, id)?;

        let attachment = payload.into_attachment(Utc::now());
        let project = self
            .repo
            .update(id, |p| {
                p.attachments.push(attachment);
                Ok(p.clone())
            })
            .await?;

        with_financials(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::{
        db::{new_store, seed::seed_workspace, AuditRepository, Store},
        models::{projects::ProjectStatus, rbac::ProjectAccess},
    };

    fn setup() -> (ProjectService, Store, Principal, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        let sarah = Principal::from(&ws.users[1]);
        let store = new_store(ws);
        let svc = ProjectService::new(
            ProjectRepository::new(store.clone()),
            AuditService::new(AuditRepository::new(store.clone())),
        );
        (svc, store, admin, sarah)
    }

    fn payload(client_id: &str) -> CreateProjectPayload {
        CreateProjectPayload {
            name: "Data Center Hardening".to_string(),
            description: String::new(),
            client_id: client_id.to_string(),
            admin_ids: vec![],
            value: Decimal::from(10000),
            costs: Decimal::from(6000),
            award_ref: String::new(),
            invoice_ref: String::new(),
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            tasks: vec!["  Survey  ".to_string(), "   ".to_string()],
            service_ids: vec!["srv-1".to_string(), "srv-404".to_string()],
        }
    }

    fn payment(amount: i64) -> AddPaymentPayload {
        AddPaymentPayload {
            amount: Decimal::from(amount),
            date: None,
            note: None,
            payment_type: None,
            invoice_ref: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequence_rate_and_creator() {
        let (svc, store, admin, _) = setup();
        let p = svc.create(&admin, payload("c-1")).await.unwrap();

        assert_eq!(p.project.id, "PRJ-1001");
        assert_eq!(p.project.tax_rate, VAT_RATE);
        assert_eq!(p.project.admin_ids, vec!["u-admin".to_string()]);
        assert_eq!(p.project.payment_rates, PaymentRates::default());
        assert_eq!(p.project.tasks.len(), 1);
        assert_eq!(p.project.tasks[0].title, "Survey");
        assert_eq!(p.project.tasks[0].status, TaskStatus::Todo);
        // serviceIds não são validados
        assert_eq!(p.project.service_ids.len(), 2);
        assert_eq!(store.read().await.audit_logs.len(), 1);

        let second = svc.create(&admin, payload("c-1")).await.unwrap();
        assert_eq!(second.project.id, "PRJ-1002");
    }

    #[tokio::test]
    async fn create_requires_existing_client() {
        let (svc, _, admin, _) = setup();
        let err = svc.create(&admin, payload("ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(_)));
        // Numeração não é consumida
        assert_eq!(svc.create(&admin, payload("c-1")).await.unwrap().project.id, "PRJ-1001");
    }

    #[tokio::test]
    async fn payments_feed_financials_and_defaults() {
        let (svc, _, admin, _) = setup();
        let id = svc.create(&admin, payload("c-1")).await.unwrap().project.id;

        let p = svc.add_payment(&admin, &id, payment(2500)).await.unwrap();
        let pay = &p.project.payments[0];
        assert_eq!(pay.note, "Progress collection");
        assert_eq!(pay.date, Utc::now().date_naive());
        assert_eq!(p.financials.total_collected, Decimal::from(2500));
        assert_eq!(p.financials.outstanding, Decimal::from(9000));

        let err = svc.add_payment(&admin, &id, payment(0)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount));

        // Pagamento acima do contrato é aceito
        let over = svc.add_payment(&admin, &id, payment(20000)).await.unwrap();
        assert!(over.financials.outstanding < Decimal::ZERO);
    }

    #[tokio::test]
    async fn task_lifecycle() {
        let (svc, _, admin, _) = setup();
        let id = svc.create(&admin, payload("c-1")).await.unwrap().project.id;

        let task = svc
            .add_task(&admin, &id, AddTaskPayload { title: " Firewall ".to_string(), due_date: NaiveDate::from_ymd_opt(2024, 9, 1) })
            .await
            .unwrap();
        assert_eq!(task.title, "Firewall");

        let blank = svc.add_task(&admin, &id, AddTaskPayload { title: "  ".to_string(), due_date: None }).await;
        assert!(matches!(blank.unwrap_err(), AppError::ValidationError(_)));

        let done = svc
            .update_task(&admin, &id, &task.id, UpdateTaskPayload { status: TaskStatus::Done })
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Done);

        svc.delete_task(&admin, &id, &task.id).await.unwrap();
        let missing = svc.delete_task(&admin, &id, &task.id).await.unwrap_err();
        assert!(matches!(missing, AppError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn project_access_limits_listing_and_detail() {
        let (svc, _, admin, mut sarah) = setup();
        let a = svc.create(&admin, payload("c-1")).await.unwrap().project.id;
        let _b = svc.create(&admin, payload("c-1")).await.unwrap().project.id;

        sarah.project_access = ProjectAccess::Only(vec![a.clone()]);
        let visible = svc.list(&sarah).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].project.id, a);

        let err = svc.get(&sarah, "PRJ-1002").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(svc.list(&admin).await.unwrap().len(), 2);
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn attachment(name: &str, url: &str) -> AddAttachmentPayload {
        AddAttachmentPayload {
            name: name.to_string(),
            url: url.to_string(),
            content_type: "application/pdf".to_string(),
            size: Some(2048),
        }
    }

    #[tokio::test]
    async fn oversized_value_is_rejected_before_persisting() {
        let (svc, _, admin, _) = setup();
        let mut huge = payload("c-1");
        huge.value = d("70000000000000000000000000000");

        let err = svc.create(&admin, huge).await.unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
        assert!(svc.list(&admin).await.unwrap().is_empty());

        let id = svc.create(&admin, payload("c-1")).await.unwrap().project.id;
        assert_eq!(id, "PRJ-1001");

        let err = svc
            .update(&admin, &id, UpdateProjectPayload { costs: Some(d("-70000000000000000000000000000")), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
        assert_eq!(svc.get(&admin, &id).await.unwrap().project.costs, Decimal::from(6000));

        let err = svc.add_payment(&admin, &id, AddPaymentPayload { amount: Decimal::MAX, ..payment(1) }).await.unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
        assert!(svc.get(&admin, &id).await.unwrap().project.payments.is_empty());
    }

    #[tokio::test]
    async fn start_date_defaults_to_today() {
        let (svc, _, admin, _) = setup();
        let p = svc.create(&admin, payload("c-1")).await.unwrap();
        assert_eq!(p.project.start_date, Some(Utc::now().date_naive()));
        assert_eq!(p.project.end_date, None);

        let mut dated = payload("c-1");
        dated.start_date = NaiveDate::from_ymd_opt(2024, 1, 15);
        let p = svc.create(&admin, dated).await.unwrap();
        assert_eq!(p.project.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[tokio::test]
    async fn explicit_null_clears_dates_and_absent_keeps_them() {
        let (svc, _, admin, _) = setup();
        let id = svc.create(&admin, payload("c-1")).await.unwrap().project.id;

        let set: UpdateProjectPayload =
            serde_json::from_value(serde_json::json!({ "endDate": "2024-12-31" })).unwrap();
        let p = svc.update(&admin, &id, set).await.unwrap();
        assert_eq!(p.project.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(p.project.start_date, Some(Utc::now().date_naive()));

        let untouched: UpdateProjectPayload =
            serde_json::from_value(serde_json::json!({ "name": "Renamed" })).unwrap();
        let p = svc.update(&admin, &id, untouched).await.unwrap();
        assert_eq!(p.project.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));

        let cleared: UpdateProjectPayload =
            serde_json::from_value(serde_json::json!({ "startDate": null, "endDate": null })).unwrap();
        let p = svc.update(&admin, &id, cleared).await.unwrap();
        assert_eq!(p.project.start_date, None);
        assert_eq!(p.project.end_date, None);
    }

    #[tokio::test]
    async fn expected_collections_need_positive_amount() {
        let (svc, _, admin, _) = setup();
        let id = svc.create(&admin, payload("c-1")).await.unwrap().project.id;
        let due = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();

        for amount in [Decimal::ZERO, Decimal::from(-100)] {
            let err = svc
                .add_expected_collection(&admin, &id, AddExpectedCollectionPayload { amount, expected_date: due, note: String::new() })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidAmount));
        }

        let p = svc
            .add_expected_collection(&admin, &id, AddExpectedCollectionPayload {
                amount: Decimal::from(4000),
                expected_date: due,
                note: "Second milestone".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(p.project.expected_collections.len(), 1);
        let entry = &p.project.expected_collections[0];
        assert_eq!(entry.amount, Decimal::from(4000));
        assert_eq!(entry.expected_date, due);
        assert_eq!(entry.note, "Second milestone");
        // Previsão não conta como recebido
        assert!(p.financials.total_collected.is_zero());
    }

    #[tokio::test]
    async fn attachments_are_stamped_and_validated() {
        let (svc, _, admin, _) = setup();
        let id = svc.create(&admin, payload("c-1")).await.unwrap().project.id;

        let p = svc
            .add_attachment(&admin, &id, attachment("contract.pdf", "https://files.securelogx.com/contract.pdf"))
            .await
            .unwrap();
        assert_eq!(p.project.attachments.len(), 1);
        assert_eq!(p.project.attachments[0].name, "contract.pdf");
        assert_eq!(p.project.attachments[0].size, Some(2048));
        assert!(p.project.attachments[0].uploaded_at.is_some());

        let err = svc.add_attachment(&admin, &id, attachment("   ", "")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.get(&admin, &id).await.unwrap().project.attachments.len(), 1);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (svc, _, admin, _) = setup();
        let mut blank = payload("c-1");
        blank.name = "   ".to_string();
        let err = svc.create(&admin, blank).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
