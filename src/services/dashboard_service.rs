// src/services/dashboard_service.rs

use chrono::{Datelike, Utc};

use crate::{
    common::error::AppError,
    db::{ProjectRepository, SettingsRepository, TicketRepository},
    models::{
        dashboard::{
            DashboardActivity, DashboardCharts, DashboardSummary, ProjectHealthEntry,
            TicketLoadEntry,
        },
        projects::{Project, ProjectStatus},
        tickets::{Ticket, TicketStatus},
    },
    services::{
        audit_service::AuditService,
        finance_service::{accounting_totals, collections_by_quarter, pipeline_by_month},
    },
};

const RECENT_AUDITS: usize = 5;

// Fatias do gráfico de carga do suporte; fatias vazias somem
fn ticket_load(tickets: &[Ticket]) -> Vec<TicketLoadEntry> {
    let count = |statuses: &[TicketStatus]| tickets.iter().filter(|t| statuses.contains(&t.status)).count();

    [
        ("Open", count(&[TicketStatus::Open])),
        ("Pending", count(&[TicketStatus::Pending])),
        ("Active", count(&[TicketStatus::InProgress])),
        ("Closed", count(&[TicketStatus::Closed, TicketStatus::Resolved])),
    ]
    .into_iter()
    .filter(|(_, value)| *value > 0)
    .map(|(name, value)| TicketLoadEntry { name: name.to_string(), value })
    .collect()
}

fn project_health(projects: &[Project]) -> Vec<ProjectHealthEntry> {
    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

    [
        ("Planning", ProjectStatus::Planning),
        ("Active", ProjectStatus::Active),
        ("On Hold", ProjectStatus::OnHold),
        ("Done", ProjectStatus::Completed),
    ]
    .into_iter()
    .map(|(name, status)| ProjectHealthEntry { name: name.to_string(), count: count(status) })
    .collect()
}

#[derive(Clone)]
pub struct DashboardService {
    project_repo: ProjectRepository,
    ticket_repo: TicketRepository,
    settings_repo: SettingsRepository,
    audit: AuditService,
}

impl DashboardService {
    pub fn new(
        project_repo: ProjectRepository,
        ticket_repo: TicketRepository,
        settings_repo: SettingsRepository,
        audit: AuditService,
    ) -> Self {
        Self { project_repo, ticket_repo, settings_repo, audit }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let projects = self.project_repo.list().await;
        let tickets = self.ticket_repo.list().await;
        let totals = accounting_totals(&projects)?;

        Ok(DashboardSummary {
            currency: self.settings_repo.currency().await,
            pipeline_value: totals.deal_value,
            total_vat: totals.vat_liability,
            total_revenue: totals.total_receivables,
            total_collected: totals.collected,
            realized_percent: totals.collection_ratio_percent,
            open_tickets: tickets.iter().filter(|t| t.status.is_open_load()).count(),
            active_projects: projects.iter().filter(|p| p.status == ProjectStatus::Active).count(),
        })
    }

    /// Gráficos do ano pedido (padrão: ano corrente). No ano corrente a tendência
    /// vai só até o mês atual.
    pub async fn get_charts(&self, year: Option<i32>) -> Result<DashboardCharts, AppError> {
        let today = Utc::now().date_naive();
        let year = year.unwrap_or(today.year());
        let through_month = if year == today.year() { today.month() } else { 12 };

        let projects = self.project_repo.list().await;
        let tickets = self.ticket_repo.list().await;

        Ok(DashboardCharts {
            year,
            monthly_trend: pipeline_by_month(&projects, year, through_month)?,
            ticket_load: ticket_load(&tickets),
            project_health: project_health(&projects),
            quarterly_collections: collections_by_quarter(&projects, year)?,
        })
    }

    pub async fn get_activity(&self) -> DashboardActivity {
        DashboardActivity {
            recent_audits: self.audit.recent(RECENT_AUDITS).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::{
        db::{new_store, seed::seed_workspace, AuditRepository},
        models::auth::Principal,
    };

    fn setup() -> (DashboardService, AuditService, Principal) {
        let ws = seed_workspace(4).unwrap();
        let admin = Principal::from(&ws.users[0]);
        let store = new_store(ws);
        let audit = AuditService::new(AuditRepository::new(store.clone()));
        let svc = DashboardService::new(
            ProjectRepository::new(store.clone()),
            TicketRepository::new(store.clone()),
            SettingsRepository::new(store),
            audit.clone(),
        );
        (svc, audit, admin)
    }

    #[tokio::test]
    async fn summary_on_seed_data() {
        let (svc, _, _) = setup();
        let s = svc.get_summary().await.unwrap();
        assert_eq!(s.currency, "SAR");
        assert_eq!(s.open_tickets, 1);
        assert_eq!(s.active_projects, 0);
        assert!(s.realized_percent.is_zero());
    }

    #[tokio::test]
    async fn charts_drop_empty_ticket_buckets() {
        let (svc, _, _) = setup();
        let c = svc.get_charts(Some(2024)).await.unwrap();
        assert_eq!(c.monthly_trend.len(), 12);
        assert_eq!(c.ticket_load.len(), 1);
        assert_eq!(c.ticket_load[0].name, "Open");
        assert_eq!(c.project_health.len(), 4);
        assert_eq!(c.quarterly_collections.len(), 4);
    }

    #[tokio::test]
    async fn current_year_trend_stops_at_current_month() {
        let (svc, _, _) = setup();
        let c = svc.get_charts(None).await.unwrap();
        assert_eq!(c.monthly_trend.len() as u32, Utc::now().month());
    }

    #[tokio::test]
    async fn activity_shows_five_latest() {
        let (svc, audit, admin) = setup();
        for i in 0..7 {
            audit.log_action(&admin, None::<&serde_json::Value>, Some(&json!({ "i": i }))).await.unwrap();
        }
        let a = svc.get_activity().await;
        assert_eq!(a.recent_audits.len(), 5);
        assert_eq!(a.recent_audits[0].after_change, Some(json!({ "i": 6 })));
    }
}
