// src/services/finance_service.rs

use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    db::{CrmRepository, ProjectRepository, SettingsRepository},
    models::{
        crm::Customer,
        dashboard::MonthlyTrendEntry,
        finance::{
            AccountingTotals, ClientBalance, FinancialPipeline, FinancialRow, ProjectFinancials,
            QuarterBucket,
        },
        projects::Project,
    },
};

/// Alíquota única do IVA. Projetos novos gravam esse valor em `tax_rate`.
pub const VAT_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// =========================================================================
//  FUNÇÕES PURAS (o núcleo financeiro)
// =========================================================================

/// Teto de qualquer valor monetário aceito em payload (1 trilhão)
pub const MAX_MONEY: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Arredondamento de apresentação: 2 casas, meio para longe do zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Barra valores de entrada fora de [-MAX_MONEY, MAX_MONEY]
pub fn bounded_money(amount: Decimal) -> Result<Decimal, AppError> {
    if amount.abs() > MAX_MONEY {
        return Err(AppError::AmountOutOfRange);
    }
    Ok(amount)
}

// Aritmética verificada: estouro de Decimal vira erro, nunca panic
fn add(a: Decimal, b: Decimal) -> Result<Decimal, AppError> {
    a.checked_add(b).ok_or(AppError::AmountOutOfRange)
}

fn sub(a: Decimal, b: Decimal) -> Result<Decimal, AppError> {
    a.checked_sub(b).ok_or(AppError::AmountOutOfRange)
}

fn sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AppError> {
    values.into_iter().try_fold(Decimal::ZERO, add)
}

fn percent(part: Decimal, whole: Decimal) -> Result<Decimal, AppError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_money)
        .ok_or(AppError::AmountOutOfRange)
}

pub fn vat_amount(value: Decimal, rate: Decimal) -> Result<Decimal, AppError> {
    value.checked_mul(rate).ok_or(AppError::AmountOutOfRange)
}

pub fn total_with_vat(value: Decimal, rate: Decimal) -> Result<Decimal, AppError> {
    add(value, vat_amount(value, rate)?)
}

pub fn total_collected(project: &Project) -> Result<Decimal, AppError> {
    sum(project.payments.iter().map(|p| p.amount))
}

pub fn project_financials(project: &Project) -> Result<ProjectFinancials, AppError> {
    let collected = total_collected(project)?;
    let vat = vat_amount(project.value, project.tax_rate)?;
    let total_contract = add(project.value, vat)?;
    let profit = sub(project.value, project.costs)?;

    Ok(ProjectFinancials {
        total_collected: round_money(collected),
        vat: round_money(vat),
        total_contract: round_money(total_contract),
        outstanding: round_money(sub(total_contract, collected)?),
        profit: round_money(profit),
        // Valor zero => margem zero (sem divisão por zero)
        margin_percent: percent(profit, project.value)?,
    })
}

pub fn accounting_totals(projects: &[Project]) -> Result<AccountingTotals, AppError> {
    let mut deal_value = Decimal::ZERO;
    let mut vat_liability = Decimal::ZERO;
    let mut collected = Decimal::ZERO;

    for p in projects {
        deal_value = add(deal_value, p.value)?;
        vat_liability = add(vat_liability, vat_amount(p.value, p.tax_rate)?)?;
        collected = add(collected, total_collected(p)?)?;
    }

    let total_receivables = add(deal_value, vat_liability)?;

    Ok(AccountingTotals {
        deal_value: round_money(deal_value),
        vat_liability: round_money(vat_liability),
        total_receivables: round_money(total_receivables),
        collected: round_money(collected),
        outstanding: round_money(sub(total_receivables, collected)?),
        collection_ratio_percent: percent(collected, total_receivables)?,
    })
}

/// Soma dos recebimentos por trimestre (Q1..Q4) do ano fiscal, pela data do pagamento
pub fn collections_by_quarter(projects: &[Project], year: i32) -> Result<Vec<QuarterBucket>, AppError> {
    let mut sums = [Decimal::ZERO; 4];

    for payment in projects.iter().flat_map(|p| p.payments.iter()) {
        if payment.date.year() != year {
            continue;
        }
        let idx = (payment.date.month0() / 3) as usize;
        sums[idx] = add(sums[idx], payment.amount)?;
    }

    Ok(sums
        .iter()
        .enumerate()
        .map(|(i, collected)| QuarterBucket {
            year,
            quarter: i as u32 + 1,
            label: format!("Q{}", i + 1),
            collected: round_money(*collected),
        })
        .collect())
}

/// Valor contratado por mês de criação, de Jan até `through_month` (1..=12)
pub fn pipeline_by_month(
    projects: &[Project],
    year: i32,
    through_month: u32,
) -> Result<Vec<MonthlyTrendEntry>, AppError> {
    let last = through_month.clamp(1, 12) as usize;

    MONTH_NAMES[..last]
        .iter()
        .enumerate()
        .map(|(i, name)| -> Result<MonthlyTrendEntry, AppError> {
            let value = sum(projects
                .iter()
                .filter(|p| p.created_at.year() == year && p.created_at.month0() as usize == i)
                .map(|p| p.value))?;
            Ok(MonthlyTrendEntry { month: name.to_string(), value: round_money(value) })
        })
        .collect()
}

/// Números do portal: contrato (com IVA) dos projetos do cliente menos o que ele já pagou.
/// O pago vem do cadastro do cliente, não do livro dos projetos.
pub fn client_balance(projects: &[Project], customer: &Customer) -> Result<ClientBalance, AppError> {
    let contract_total = projects
        .iter()
        .filter(|p| p.client_id == customer.id)
        .try_fold(Decimal::ZERO, |acc, p| total_with_vat(p.value, p.tax_rate).and_then(|t| add(acc, t)))?;

    Ok(ClientBalance {
        contract_total: round_money(contract_total),
        paid: round_money(customer.paid_amount),
        outstanding: round_money(sub(contract_total, customer.paid_amount)?),
    })
}

// =========================================================================
//  SERVIÇO (pipeline financeiro)
// =========================================================================

#[derive(Clone)]
pub struct FinanceService {
    project_repo: ProjectRepository,
    crm_repo: CrmRepository,
    settings_repo: SettingsRepository,
}

impl FinanceService {
    pub fn new(
        project_repo: ProjectRepository,
        crm_repo: CrmRepository,
        settings_repo: SettingsRepository,
    ) -> Self {
        Self { project_repo, crm_repo, settings_repo }
    }

    pub async fn pipeline(&self) -> Result<FinancialPipeline, AppError> {
        let projects = self.project_repo.list().await;
        let customers = self.crm_repo.list().await;

        let rows = projects
            .iter()
            .map(|p| -> Result<FinancialRow, AppError> {
                Ok(FinancialRow {
                    client_name: customers
                        .iter()
                        .find(|c| c.id == p.client_id)
                        .map(|c| c.company.clone())
                        .unwrap_or_else(|| "Unknown Client".to_string()),
                    financials: project_financials(p)?,
                    project: p.clone(),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(FinancialPipeline {
            currency: self.settings_repo.currency().await,
            rows,
            totals: accounting_totals(&projects)?,
        })
    }

    pub async fn quarterly(&self, year: i32) -> Result<Vec<QuarterBucket>, AppError> {
        collections_by_quarter(&self.project_repo.list().await, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::models::{
        auth::AccountStatus,
        crm::CustomerStatus,
        projects::{PaymentRates, ProjectPayment, ProjectStatus},
    };

    fn project(id: &str, client_id: &str, value: Decimal, costs: Decimal) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Projeto {id}"),
            description: String::new(),
            client_id: client_id.to_string(),
            admin_ids: vec![],
            value,
            costs,
            award_ref: String::new(),
            invoice_ref: String::new(),
            tax_rate: VAT_RATE,
            payment_rates: PaymentRates::default(),
            payments: vec![],
            expected_collections: vec![],
            guarantees: String::new(),
            financial_notes: String::new(),
            status: ProjectStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            start_date: None,
            end_date: None,
            tasks: vec![],
            attachments: vec![],
            service_ids: vec![],
        }
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn pay(amount: Decimal, date: &str) -> ProjectPayment {
        ProjectPayment {
            id: format!("pay-{date}"),
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            note: "Progress collection".to_string(),
            payment_type: None,
            invoice_ref: None,
        }
    }

    #[test]
    fn vat_is_fifteen_percent_of_value() {
        assert_eq!(vat_amount(d("10000"), VAT_RATE).unwrap(), d("1500"));
        assert_eq!(total_with_vat(d("10000"), VAT_RATE).unwrap(), d("11500"));
    }

    #[test]
    fn project_financials_derive_from_ledger() {
        let mut p = project("PRJ-1001", "c-1", d("10000"), d("6000"));
        p.payments.push(pay(d("2500"), "2024-04-01"));
        p.payments.push(pay(d("500"), "2024-05-01"));

        let f = project_financials(&p).unwrap();
        assert_eq!(f.total_collected, d("3000"));
        assert_eq!(f.vat, d("1500"));
        assert_eq!(f.total_contract, d("11500"));
        assert_eq!(f.outstanding, d("8500"));
        assert_eq!(f.profit, d("4000"));
        assert_eq!(f.margin_percent, d("40"));
    }

    #[test]
    fn margin_is_zero_when_value_is_zero() {
        let p = project("PRJ-1001", "c-1", Decimal::ZERO, d("300"));
        let f = project_financials(&p).unwrap();
        assert_eq!(f.margin_percent, Decimal::ZERO);
        assert_eq!(f.profit, d("-300"));
    }

    #[test]
    fn overpayment_yields_negative_outstanding() {
        let mut p = project("PRJ-1001", "c-1", d("1000"), Decimal::ZERO);
        p.payments.push(pay(d("2000"), "2024-01-15"));
        assert_eq!(project_financials(&p).unwrap().outstanding, d("-850"));
    }

    #[test]
    fn accounting_totals_sum_every_project() {
        let mut a = project("PRJ-1001", "c-1", d("10000"), Decimal::ZERO);
        a.payments.push(pay(d("5750"), "2024-02-01"));
        let b = project("PRJ-1002", "c-1", d("10000"), Decimal::ZERO);

        let t = accounting_totals(&[a, b]).unwrap();
        assert_eq!(t.deal_value, d("20000"));
        assert_eq!(t.vat_liability, d("3000"));
        assert_eq!(t.total_receivables, d("23000"));
        assert_eq!(t.collected, d("5750"));
        assert_eq!(t.outstanding, d("17250"));
        assert_eq!(t.collection_ratio_percent, d("25"));
    }

    #[test]
    fn collection_ratio_is_zero_without_receivables() {
        let t = accounting_totals(&[]).unwrap();
        assert_eq!(t, AccountingTotals::default());
    }

    #[test]
    fn quarters_bucket_by_payment_date_and_year() {
        let mut p = project("PRJ-1001", "c-1", d("50000"), Decimal::ZERO);
        p.payments.push(pay(d("100"), "2024-01-31"));
        p.payments.push(pay(d("200"), "2024-03-31"));
        p.payments.push(pay(d("300"), "2024-04-01"));
        p.payments.push(pay(d("400"), "2024-12-31"));
        p.payments.push(pay(d("999"), "2023-12-31"));

        let q = collections_by_quarter(&[p], 2024).unwrap();
        let totals: Vec<Decimal> = q.iter().map(|b| b.collected).collect();
        assert_eq!(totals, vec![d("300"), d("300"), Decimal::ZERO, d("400")]);
        assert_eq!(q[0].label, "Q1");
        assert_eq!(q[3].quarter, 4);
    }

    #[test]
    fn monthly_pipeline_runs_through_requested_month() {
        let p = project("PRJ-1001", "c-1", d("7000"), Decimal::ZERO);
        let trend = pipeline_by_month(&[p], 2024, 4).unwrap();
        assert_eq!(trend.len(), 4);
        assert_eq!(trend[2].month, "Mar");
        assert_eq!(trend[2].value, d("7000"));
        assert_eq!(trend[0].value, Decimal::ZERO);
    }

    #[test]
    fn client_balance_uses_customer_paid_amount() {
        let customer = Customer {
            id: "c-1".to_string(),
            name: "Sarah Jenkins".to_string(),
            company: "Acme Inc.".to_string(),
            email: "s.jenkins@acme.inc".to_string(),
            phone: String::new(),
            status: CustomerStatus::Active,
            account_status: AccountStatus::Approved,
            lifetime_value: Decimal::ZERO,
            total_price: Decimal::ZERO,
            paid_amount: d("1000"),
            last_contact: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            assigned_to: "u-admin".to_string(),
            password_hash: None,
            description: None,
            industry: None,
        };
        let own = project("PRJ-1001", "c-1", d("10000"), Decimal::ZERO);
        let other = project("PRJ-1002", "cust-2", d("99999"), Decimal::ZERO);

        let b = client_balance(&[own, other], &customer).unwrap();
        assert_eq!(b.contract_total, d("11500"));
        assert_eq!(b.paid, d("1000"));
        assert_eq!(b.outstanding, d("10500"));
    }

    #[test]
    fn oversized_values_error_instead_of_panicking() {
        let huge = project("PRJ-1001", "c-1", d("70000000000000000000000000000"), Decimal::ZERO);
        assert!(matches!(project_financials(&huge), Err(AppError::AmountOutOfRange)));
        assert!(matches!(accounting_totals(&[huge.clone()]), Err(AppError::AmountOutOfRange)));

        let mut a = project("PRJ-1002", "c-1", Decimal::ZERO, Decimal::ZERO);
        a.payments.push(pay(Decimal::MAX, "2024-01-10"));
        a.payments.push(pay(Decimal::MAX, "2024-02-10"));
        assert!(matches!(collections_by_quarter(&[a], 2024), Err(AppError::AmountOutOfRange)));
    }

    #[test]
    fn input_bound_is_one_trillion() {
        assert_eq!(MAX_MONEY, d("1000000000000"));
        assert_eq!(bounded_money(MAX_MONEY).unwrap(), MAX_MONEY);
        assert_eq!(bounded_money(-MAX_MONEY).unwrap(), -MAX_MONEY);
        assert!(matches!(bounded_money(d("1000000000000.01")), Err(AppError::AmountOutOfRange)));
        assert!(matches!(bounded_money(d("70000000000000000000000000000")), Err(AppError::AmountOutOfRange)));
    }

    #[test]
    fn rounding_is_two_places() {
        assert_eq!(round_money(d("1.005")), d("1.01"));
        assert_eq!(round_money(d("33.3333")), d("33.33"));
    }
}
