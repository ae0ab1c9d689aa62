// src/services/portal_service.rs

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{CrmRepository, ProjectRepository, SettingsRepository, TicketRepository},
    models::{
        auth::Principal,
        portal::PortalOverview,
        projects::ProjectWithFinancials,
    },
    services::finance_service::{bounded_money, client_balance, project_financials},
};

#[derive(Clone)]
pub struct PortalService {
    crm_repo: CrmRepository,
    project_repo: ProjectRepository,
    ticket_repo: TicketRepository,
    settings_repo: SettingsRepository,
}

impl PortalService {
    pub fn new(
        crm_repo: CrmRepository,
        project_repo: ProjectRepository,
        ticket_repo: TicketRepository,
        settings_repo: SettingsRepository,
    ) -> Self {
        Self { crm_repo, project_repo, ticket_repo, settings_repo }
    }

    /// Tudo o que o cliente logado enxerga: cadastro, projetos, chamados e saldo
    pub async fn overview(&self, client: &Principal) -> Result<PortalOverview, AppError> {
        let customer = self
            .crm_repo
            .find_by_id(&client.id)
            .await
            .ok_or_else(|| AppError::CustomerNotFound(client.id.clone()))?;

        let projects = self.project_repo.list_by_client(&customer.id).await;
        let balance = client_balance(&projects, &customer)?;
        let projects = projects
            .into_iter()
            .map(|p| project_financials(&p).map(|financials| ProjectWithFinancials { financials, project: p }))
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(PortalOverview {
            currency: self.settings_repo.currency().await,
            balance,
            projects,
            tickets: self.ticket_repo.list_by_client(&customer.id).await,
            customer,
        })
    }

    /// Pagamento pelo portal: soma no pago e no lifetime value, e marca o contato de hoje
    pub async fn make_payment(&self, client: &Principal, amount: Decimal) -> Result<PortalOverview, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount);
        }
        let amount = bounded_money(amount)?;

        self.crm_repo
            .update(&client.id, |c| {
                let paid = c.paid_amount.checked_add(amount).ok_or(AppError::AmountOutOfRange)?;
                let lifetime = c.lifetime_value.checked_add(amount).ok_or(AppError::AmountOutOfRange)?;
                c.paid_amount = paid;
                c.lifetime_value = lifetime;
                c.last_contact = Utc::now().date_naive();
                Ok(())
            })
            .await?;

        let overview = self.overview(client).await?;
        if overview.balance.outstanding < Decimal::ZERO {
            tracing::warn!(
                "⚠️ Cliente {} pagou {} além do contratado",
                client.id,
                -overview.balance.outstanding
            );
        }
        tracing::info!("💳 Pagamento de {} recebido pelo portal ({})", amount, client.email);
        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{new_store, seed::seed_workspace};

    async fn setup() -> (PortalService, Principal) {
        let store = new_store(seed_workspace(4).unwrap());
        let crm = CrmRepository::new(store.clone());
        let client = crm.find_by_id("c-1").await.map(|c| Principal::from(&c)).unwrap();
        let svc = PortalService::new(
            crm,
            ProjectRepository::new(store.clone()),
            TicketRepository::new(store.clone()),
            SettingsRepository::new(store),
        );
        (svc, client)
    }

    #[tokio::test]
    async fn overview_shows_only_own_data() {
        let (svc, client) = setup().await;
        let o = svc.overview(&client).await.unwrap();
        assert_eq!(o.customer.id, "c-1");
        assert_eq!(o.tickets.len(), 1);
        assert!(o.projects.is_empty());
        assert_eq!(o.balance.paid, Decimal::from(8500));
    }

    #[tokio::test]
    async fn payment_updates_customer_totals() {
        let (svc, client) = setup().await;
        let o = svc.make_payment(&client, Decimal::from(1500)).await.unwrap();
        assert_eq!(o.customer.paid_amount, Decimal::from(10000));
        assert_eq!(o.customer.lifetime_value, Decimal::from(14000));
        assert_eq!(o.customer.last_contact, Utc::now().date_naive());

        let err = svc.make_payment(&client, Decimal::ZERO).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount));
    }

    #[tokio::test]
    async fn oversized_payment_is_rejected_and_totals_kept() {
        let (svc, client) = setup().await;
        let err = svc.make_payment(&client, Decimal::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));

        let o = svc.overview(&client).await.unwrap();
        assert_eq!(o.customer.paid_amount, Decimal::from(8500));
    }
}
