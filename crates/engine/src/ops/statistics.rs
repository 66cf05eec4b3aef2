//! Read-side rollups over a transaction window.
//!
//! Everything here is computed from plain queries; no balances are written.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, TransactionKind, accounts, categories, transactions,
};

use super::Engine;

const BREAKDOWN_LIMIT: usize = 8;
const TOP_SPENDING_LIMIT: usize = 5;
const TREND_MONTHS: u32 = 6;
const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Reporting window selector. Unrecognized keywords fall back to `Month`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatsPeriod {
    #[default]
    Month,
    Quarter,
    Year,
    All,
}

impl StatsPeriod {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "quarter" => Self::Quarter,
            "year" => Self::Year,
            "all" => Self::All,
            _ => Self::Month,
        }
    }

    fn start(self, now: DateTime<Utc>) -> ResultEngine<DateTime<Utc>> {
        let date = match self {
            Self::Month => month_start(now.date_naive())?,
            Self::Quarter => {
                return now
                    .checked_sub_months(Months::new(3))
                    .ok_or_else(invalid_date);
            }
            Self::Year => NaiveDate::from_ymd_opt(now.year(), 1, 1).ok_or_else(invalid_date)?,
            Self::All => NaiveDate::from_ymd_opt(2000, 1, 1).ok_or_else(invalid_date)?,
        };
        start_of_day(date)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
    pub net_income: MoneyCents,
    /// Percentage of income kept, 0 when there was no income.
    pub savings_rate: f64,
    /// Sum of all account balances, independent of the selected period.
    pub net_worth: MoneyCents,
    pub expense_breakdown: Vec<CategorySummary>,
    pub income_breakdown: Vec<CategorySummary>,
    pub monthly_trends: Vec<MonthlyPoint>,
    pub daily_trend: Vec<DailyPoint>,
    pub top_spending: Vec<TopTransaction>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySummary {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub total: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub income: MoneyCents,
    pub expenses: MoneyCents,
    pub net: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub expenses: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopTransaction {
    pub id: Uuid,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: MoneyCents,
    pub occurred_at: DateTime<Utc>,
}

fn invalid_date() -> EngineError {
    EngineError::InvalidInput("date out of range".to_string())
}

fn month_start(date: NaiveDate) -> ResultEngine<NaiveDate> {
    date.with_day(1).ok_or_else(invalid_date)
}

fn start_of_day(date: NaiveDate) -> ResultEngine<DateTime<Utc>> {
    Ok(date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(invalid_date)?
        .and_utc())
}

fn breakdown_for(
    models: &[transactions::Model],
    kind: TransactionKind,
    category_names: &HashMap<Uuid, String>,
) -> Vec<CategorySummary> {
    let mut totals: HashMap<Option<Uuid>, i64> = HashMap::new();
    for model in models {
        if model.kind != kind.as_str() {
            continue;
        }
        *totals.entry(model.category_id).or_insert(0) += model.amount_minor;
    }

    let mut summaries: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category_id, total)| CategorySummary {
            category_id,
            name: category_id
                .and_then(|id| category_names.get(&id).cloned())
                .unwrap_or_else(|| UNCATEGORIZED_NAME.to_string()),
            total: MoneyCents::new(total),
        })
        .collect();
    summaries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    summaries.truncate(BREAKDOWN_LIMIT);
    summaries
}

async fn window_transactions(
    db: &impl sea_orm::ConnectionTrait,
    owner: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> ResultEngine<Vec<transactions::Model>> {
    let models = transactions::Entity::find()
        .filter(transactions::Column::Owner.eq(owner.to_string()))
        .filter(transactions::Column::Kind.is_in([
            TransactionKind::Income.as_str(),
            TransactionKind::Expense.as_str(),
        ]))
        .filter(transactions::Column::OccurredAt.gte(from))
        .filter(transactions::Column::OccurredAt.lte(to))
        .all(db)
        .await?;
    Ok(models)
}

impl Engine {
    /// Computes the statistics rollup for one owner.
    ///
    /// `period` bounds the totals, breakdowns, and top-spending list; the
    /// monthly trend always covers the trailing six calendar months and the
    /// daily trend the current calendar month, regardless of `period`.
    pub async fn statistics(
        &self,
        owner: &str,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> ResultEngine<Statistics> {
        let window_start = period.start(now)?;
        let windowed = window_transactions(&self.database, owner, window_start, now).await?;

        let current_month_start = start_of_day(month_start(now.date_naive())?)?;
        let trend_start = start_of_day(month_start(
            now.date_naive()
                .checked_sub_months(Months::new(TREND_MONTHS - 1))
                .ok_or_else(invalid_date)?,
        )?)?;
        let trend_window = window_transactions(&self.database, owner, trend_start, now).await?;

        let account_models = accounts::Entity::find()
            .filter(accounts::Column::Owner.eq(owner.to_string()))
            .all(&self.database)
            .await?;
        let net_worth = MoneyCents::new(
            account_models
                .iter()
                .map(|model| model.balance_minor)
                .sum::<i64>(),
        );

        let category_names: HashMap<Uuid, String> = categories::Entity::find()
            .filter(categories::Column::Owner.eq(owner.to_string()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| (model.id, model.name))
            .collect();

        let mut total_income = 0i64;
        let mut total_expenses = 0i64;
        for model in &windowed {
            match model.kind.as_str() {
                "income" => total_income += model.amount_minor,
                "expense" => total_expenses += model.amount_minor,
                _ => {}
            }
        }
        let net_income = total_income - total_expenses;
        let savings_rate = if total_income > 0 {
            net_income as f64 / total_income as f64 * 100.0
        } else {
            0.0
        };

        let expense_breakdown =
            breakdown_for(&windowed, TransactionKind::Expense, &category_names);
        let income_breakdown = breakdown_for(&windowed, TransactionKind::Income, &category_names);

        // One point per month, oldest first, zero-filled.
        let mut month_keys = Vec::with_capacity(TREND_MONTHS as usize);
        for offset in (0..TREND_MONTHS).rev() {
            let month = now
                .date_naive()
                .checked_sub_months(Months::new(offset))
                .ok_or_else(invalid_date)?;
            month_keys.push((month.year(), month.month()));
        }
        let mut trend_totals: HashMap<(i32, u32), (i64, i64)> = HashMap::new();
        for model in &trend_window {
            let date = model.occurred_at.date_naive();
            let entry = trend_totals.entry((date.year(), date.month())).or_insert((0, 0));
            match model.kind.as_str() {
                "income" => entry.0 += model.amount_minor,
                "expense" => entry.1 += model.amount_minor,
                _ => {}
            }
        }
        let monthly_trends = month_keys
            .into_iter()
            .map(|key| {
                let (income, expenses) = trend_totals.get(&key).copied().unwrap_or((0, 0));
                MonthlyPoint {
                    year: key.0,
                    month: key.1,
                    income: MoneyCents::new(income),
                    expenses: MoneyCents::new(expenses),
                    net: MoneyCents::new(income - expenses),
                }
            })
            .collect();

        let mut daily_totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for model in &trend_window {
            if model.kind != TransactionKind::Expense.as_str()
                || model.occurred_at < current_month_start
            {
                continue;
            }
            *daily_totals.entry(model.occurred_at.date_naive()).or_insert(0) +=
                model.amount_minor;
        }
        let daily_trend = daily_totals
            .into_iter()
            .map(|(date, expenses)| DailyPoint {
                date,
                expenses: MoneyCents::new(expenses),
            })
            .collect();

        let mut expenses: Vec<&transactions::Model> = windowed
            .iter()
            .filter(|model| model.kind == TransactionKind::Expense.as_str())
            .collect();
        expenses.sort_by(|a, b| b.amount_minor.cmp(&a.amount_minor));
        let top_spending = expenses
            .into_iter()
            .take(TOP_SPENDING_LIMIT)
            .map(|model| TopTransaction {
                id: model.id,
                description: model.description.clone(),
                category: model
                    .category_id
                    .and_then(|id| category_names.get(&id).cloned()),
                amount: MoneyCents::new(model.amount_minor),
                occurred_at: model.occurred_at,
            })
            .collect();

        Ok(Statistics {
            total_income: MoneyCents::new(total_income),
            total_expenses: MoneyCents::new(total_expenses),
            net_income: MoneyCents::new(net_income),
            savings_rate,
            net_worth,
            expense_breakdown,
            income_breakdown,
            monthly_trends,
            daily_trend,
            top_spending,
        })
    }
}
