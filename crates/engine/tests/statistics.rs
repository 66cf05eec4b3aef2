use chrono::{Datelike, Months, Utc};
use engine::{AccountKind, CategoryKind, NewCategoryCmd, StatsPeriod, TransactionKind};

mod common;
use common::{account, engine_with_db, tx_cmd};

async fn expense_category(engine: &engine::Engine, owner: &str, name: &str) -> engine::Category {
    engine
        .new_category(NewCategoryCmd {
            owner: owner.to_string(),
            name: name.to_string(),
            kind: CategoryKind::Expense,
            parent_id: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn totals_and_savings_rate() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 0).await;

    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Income, 200_00))
        .await
        .unwrap();
    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 50_00))
        .await
        .unwrap();

    let stats = engine
        .statistics("alice", StatsPeriod::Month, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.total_income.cents(), 200_00);
    assert_eq!(stats.total_expenses.cents(), 50_00);
    assert_eq!(stats.net_income.cents(), 150_00);
    assert!((stats.savings_rate - 75.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn savings_rate_is_zero_without_income() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 50_00))
        .await
        .unwrap();

    let stats = engine
        .statistics("alice", StatsPeriod::Month, Utc::now())
        .await
        .unwrap();
    assert_eq!(stats.savings_rate, 0.0);
}

#[tokio::test]
async fn breakdown_is_sorted_descending_and_capped() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 1_000_00).await;

    // Ten categories with increasing totals; only the largest eight survive.
    for i in 1..=10i64 {
        let category = expense_category(&engine, "alice", &format!("Category {i:02}")).await;
        let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Expense, i * 1_00);
        cmd.category_id = Some(category.id);
        engine.create_transaction(cmd).await.unwrap();
    }

    let stats = engine
        .statistics("alice", StatsPeriod::Month, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.expense_breakdown.len(), 8);
    assert_eq!(stats.expense_breakdown[0].total.cents(), 10_00);
    assert_eq!(stats.expense_breakdown[7].total.cents(), 3_00);
    for pair in stats.expense_breakdown.windows(2) {
        assert!(pair[0].total >= pair[1].total);
    }
    assert!(stats.income_breakdown.is_empty());
}

#[tokio::test]
async fn net_worth_ignores_the_selected_period() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 40_00).await;
    let _savings = account(&engine, "alice", "Savings", AccountKind::Savings, 60_00).await;

    // An old expense outside every bounded window still shows in balances.
    let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Expense, 10_00);
    cmd.occurred_at = Utc::now().checked_sub_months(Months::new(14)).unwrap();
    engine.create_transaction(cmd).await.unwrap();

    let stats = engine
        .statistics("alice", StatsPeriod::Month, Utc::now())
        .await
        .unwrap();
    assert_eq!(stats.total_expenses.cents(), 0);
    assert_eq!(stats.net_worth.cents(), 90_00);

    let all_time = engine
        .statistics("alice", StatsPeriod::All, Utc::now())
        .await
        .unwrap();
    assert_eq!(all_time.total_expenses.cents(), 10_00);
    assert_eq!(all_time.net_worth.cents(), 90_00);
}

#[tokio::test]
async fn top_spending_keeps_the_five_largest() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 1_000_00).await;

    for amount in [5_00i64, 40_00, 10_00, 25_00, 15_00, 30_00] {
        engine
            .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, amount))
            .await
            .unwrap();
    }

    let stats = engine
        .statistics("alice", StatsPeriod::Month, Utc::now())
        .await
        .unwrap();

    let amounts: Vec<i64> = stats
        .top_spending
        .iter()
        .map(|top| top.amount.cents())
        .collect();
    assert_eq!(amounts, vec![40_00, 30_00, 25_00, 15_00, 10_00]);
}

#[tokio::test]
async fn monthly_trends_cover_six_months() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 0).await;
    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Income, 100_00))
        .await
        .unwrap();

    let now = Utc::now();
    let stats = engine
        .statistics("alice", StatsPeriod::Month, now)
        .await
        .unwrap();

    assert_eq!(stats.monthly_trends.len(), 6);
    let last = stats.monthly_trends.last().unwrap();
    assert_eq!(
        (last.year, last.month),
        (
            now.date_naive().year(),
            now.date_naive().month()
        )
    );
    assert_eq!(last.income.cents(), 100_00);
    assert_eq!(stats.daily_trend.len(), 0);
}

#[tokio::test]
async fn daily_trend_tracks_current_month_expenses() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 12_00))
        .await
        .unwrap();
    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 8_00))
        .await
        .unwrap();

    let stats = engine
        .statistics("alice", StatsPeriod::Month, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.daily_trend.len(), 1);
    assert_eq!(stats.daily_trend[0].expenses.cents(), 20_00);
}

#[tokio::test]
async fn unknown_period_falls_back_to_month() {
    assert_eq!(StatsPeriod::parse("bogus"), StatsPeriod::Month);
    assert_eq!(StatsPeriod::parse("quarter"), StatsPeriod::Quarter);
    assert_eq!(StatsPeriod::parse("YEAR"), StatsPeriod::Year);
    assert_eq!(StatsPeriod::parse("all"), StatsPeriod::All);
}
