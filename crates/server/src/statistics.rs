//! Statistics API endpoints

use api_types::stats::{
    CategorySummaryView, DailyPointView, MonthlyPointView, StatsQuery, Statistic,
    TopTransactionView,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};
use engine::{StatsPeriod, users};

/// Handle requests for user statistics
pub async fn get_stats(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Statistic>, ServerError> {
    let period = StatsPeriod::parse(query.period.as_deref().unwrap_or("month"));
    let stats = state
        .engine
        .statistics(&user.username, period, Utc::now())
        .await?;

    let map_summary = |summary: engine::CategorySummary| CategorySummaryView {
        category_id: summary.category_id,
        name: summary.name,
        total_minor: summary.total.cents(),
    };

    Ok(Json(Statistic {
        total_income_minor: stats.total_income.cents(),
        total_expenses_minor: stats.total_expenses.cents(),
        net_income_minor: stats.net_income.cents(),
        savings_rate: stats.savings_rate,
        net_worth_minor: stats.net_worth.cents(),
        expense_breakdown: stats.expense_breakdown.into_iter().map(map_summary).collect(),
        income_breakdown: stats.income_breakdown.into_iter().map(map_summary).collect(),
        monthly_trends: stats
            .monthly_trends
            .into_iter()
            .map(|point| MonthlyPointView {
                year: point.year,
                month: point.month,
                income_minor: point.income.cents(),
                expenses_minor: point.expenses.cents(),
                net_minor: point.net.cents(),
            })
            .collect(),
        daily_trend: stats
            .daily_trend
            .into_iter()
            .map(|point| DailyPointView {
                date: point.date,
                expenses_minor: point.expenses.cents(),
            })
            .collect(),
        top_spending: stats
            .top_spending
            .into_iter()
            .map(|top| TopTransactionView {
                id: top.id,
                description: top.description,
                category: top.category,
                amount_minor: top.amount.cents(),
                occurred_at: top.occurred_at,
            })
            .collect(),
    }))
}
