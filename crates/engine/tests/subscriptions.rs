use chrono::{NaiveDate, Utc};
use engine::{
    AccountKind, BillingFrequency, EngineError, MoneyCents, NewSubscriptionCmd,
    SubscriptionStatus, TransactionListFilter, UpdateSubscriptionCmd,
};
use uuid::Uuid;

mod common;
use common::{account, balance_of, engine_with_db};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn subscription_cmd(
    owner: &str,
    account_id: Uuid,
    amount_minor: i64,
    next: NaiveDate,
) -> NewSubscriptionCmd {
    NewSubscriptionCmd {
        owner: owner.to_string(),
        name: "Streaming".to_string(),
        amount: MoneyCents::new(amount_minor),
        frequency: BillingFrequency::Monthly,
        next_billing_date: next,
        account_id,
        category_id: None,
    }
}

#[tokio::test]
async fn process_bills_once_and_advances_the_date() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let subscription = engine
        .new_subscription(subscription_cmd(
            "alice",
            checking.id,
            15_00,
            date(2024, 1, 31),
        ))
        .await
        .unwrap();

    let processed = engine
        .process_subscription(subscription.id, "alice", Utc::now())
        .await
        .unwrap();

    // Month-end clamp: Jan 31 + 1 month lands on Feb 29 in a leap year.
    assert_eq!(processed.next_billing_date, date(2024, 2, 29));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 85_00);

    let tx = engine
        .transaction(processed.transaction_id, "alice")
        .await
        .unwrap();
    assert_eq!(tx.amount.cents(), 15_00);
    assert_eq!(tx.description.as_deref(), Some("Subscription: Streaming"));

    let stored = engine.subscription(subscription.id, "alice").await.unwrap();
    assert_eq!(stored.next_billing_date, date(2024, 2, 29));
    assert_eq!(stored.status, SubscriptionStatus::Active);
}

#[tokio::test]
async fn paused_subscription_is_not_processable() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let subscription = engine
        .new_subscription(subscription_cmd(
            "alice",
            checking.id,
            15_00,
            date(2024, 1, 31),
        ))
        .await
        .unwrap();

    let mut update = UpdateSubscriptionCmd::for_subscription(subscription.id, "alice");
    update.status = Some(SubscriptionStatus::Paused);
    engine.update_subscription(update).await.unwrap();

    let err = engine
        .process_subscription(subscription.id, "alice", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
}

#[tokio::test]
async fn failed_billing_rolls_back_the_whole_event() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 10_00).await;
    let subscription = engine
        .new_subscription(subscription_cmd(
            "alice",
            checking.id,
            15_00,
            date(2024, 1, 15),
        ))
        .await
        .unwrap();

    let err = engine
        .process_subscription(subscription.id, "alice", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    // Neither the date advanced nor a transaction appeared.
    let stored = engine.subscription(subscription.id, "alice").await.unwrap();
    assert_eq!(stored.next_billing_date, date(2024, 1, 15));
    let (transactions, _) = engine
        .transactions_page("alice", 10, None, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(transactions.is_empty());
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 10_00);
}

#[tokio::test]
async fn batch_processing_isolates_failures() {
    let engine = engine_with_db().await;
    let funded = account(&engine, "alice", "Funded", AccountKind::Checking, 100_00).await;
    let broke = account(&engine, "alice", "Broke", AccountKind::Checking, 1_00).await;

    engine
        .new_subscription(subscription_cmd("alice", funded.id, 20_00, date(2024, 1, 1)))
        .await
        .unwrap();
    engine
        .new_subscription(subscription_cmd("alice", broke.id, 20_00, date(2024, 1, 1)))
        .await
        .unwrap();

    let report = engine
        .process_due_subscriptions(Some("alice"), date(2024, 1, 2), Utc::now())
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(balance_of(&engine, funded.id, "alice").await, 80_00);
    assert_eq!(balance_of(&engine, broke.id, "alice").await, 1_00);
}

#[tokio::test]
async fn batch_skips_not_yet_due_subscriptions() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;

    engine
        .new_subscription(subscription_cmd(
            "alice",
            checking.id,
            20_00,
            date(2024, 3, 10),
        ))
        .await
        .unwrap();

    let report = engine
        .process_due_subscriptions(Some("alice"), date(2024, 3, 9), Utc::now())
        .await
        .unwrap();
    assert_eq!(report.processed, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
}
