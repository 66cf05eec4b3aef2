use engine::{
    AccountKind, EngineError, MoneyCents, TransactionKind, TransactionListFilter,
    UpdateTransactionCmd,
};

mod common;
use common::{account, balance_of, engine_with_db, tx_cmd};

#[tokio::test]
async fn expense_update_delete_roundtrip() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;

    let tx_id = engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 40_00))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 60_00);

    let mut update = UpdateTransactionCmd::for_transaction(tx_id, "alice");
    update.amount = Some(MoneyCents::new(70_00));
    engine.update_transaction(update).await.unwrap();
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 30_00);

    engine.delete_transaction(tx_id, "alice").await.unwrap();
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
}

#[tokio::test]
async fn expense_over_balance_rejected() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 50_00).await;

    let err = engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 60_00))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 50_00);

    let (transactions, _) = engine
        .transactions_page("alice", 10, None, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn credit_card_expense_can_go_negative() {
    let engine = engine_with_db().await;
    let card = account(&engine, "alice", "Visa", AccountKind::CreditCard, 10_00).await;

    engine
        .create_transaction(tx_cmd("alice", card.id, TransactionKind::Expense, 35_00))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, card.id, "alice").await, -25_00);
}

#[tokio::test]
async fn transfer_moves_funds_between_accounts() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let savings = account(&engine, "alice", "Savings", AccountKind::Savings, 0).await;

    let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Transfer, 30_00);
    cmd.to_account_id = Some(savings.id);
    let tx_id = engine.create_transaction(cmd).await.unwrap();

    assert_eq!(balance_of(&engine, checking.id, "alice").await, 70_00);
    assert_eq!(balance_of(&engine, savings.id, "alice").await, 30_00);

    engine.delete_transaction(tx_id, "alice").await.unwrap();
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
    assert_eq!(balance_of(&engine, savings.id, "alice").await, 0);
}

#[tokio::test]
async fn transfer_to_same_account_rejected() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;

    let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Transfer, 30_00);
    cmd.to_account_id = Some(checking.id);
    let err = engine.create_transaction(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
}

#[tokio::test]
async fn transfer_requires_destination_and_funds() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 20_00).await;
    let savings = account(&engine, "alice", "Savings", AccountKind::Savings, 0).await;

    let cmd = tx_cmd("alice", checking.id, TransactionKind::Transfer, 10_00);
    let err = engine.create_transaction(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Transfer, 50_00);
    cmd.to_account_id = Some(savings.id);
    let err = engine.create_transaction(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 20_00);
    assert_eq!(balance_of(&engine, savings.id, "alice").await, 0);
}

#[tokio::test]
async fn cross_owner_account_rejected() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;

    let err = engine
        .create_transaction(tx_cmd("mallory", checking.id, TransactionKind::Expense, 10_00))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
}

#[tokio::test]
async fn update_moves_expense_to_another_account() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let cash = account(&engine, "alice", "Cash", AccountKind::Cash, 50_00).await;

    let tx_id = engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 40_00))
        .await
        .unwrap();

    let mut update = UpdateTransactionCmd::for_transaction(tx_id, "alice");
    update.account_id = Some(cash.id);
    engine.update_transaction(update).await.unwrap();

    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
    assert_eq!(balance_of(&engine, cash.id, "alice").await, 10_00);
}

#[tokio::test]
async fn update_kind_flip_adjusts_both_directions() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;

    let tx_id = engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 40_00))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 60_00);

    let mut update = UpdateTransactionCmd::for_transaction(tx_id, "alice");
    update.kind = Some(TransactionKind::Income);
    engine.update_transaction(update).await.unwrap();
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 140_00);
}

#[tokio::test]
async fn balance_is_sum_of_live_effects() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 0).await;

    let income = engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Income, 200_00))
        .await
        .unwrap();
    engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 30_00))
        .await
        .unwrap();
    let second_expense = engine
        .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Expense, 20_00))
        .await
        .unwrap();
    engine.delete_transaction(second_expense, "alice").await.unwrap();

    let mut update = UpdateTransactionCmd::for_transaction(income, "alice");
    update.amount = Some(MoneyCents::new(150_00));
    engine.update_transaction(update).await.unwrap();

    // 150 income - 30 expense, the deleted expense contributes nothing.
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 120_00);
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 0).await;

    for _ in 0..3 {
        engine
            .create_transaction(tx_cmd("alice", checking.id, TransactionKind::Income, 10_00))
            .await
            .unwrap();
    }

    let (page, cursor) = engine
        .transactions_page("alice", 2, None, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    let cursor = cursor.expect("expected a second page");

    let (rest, cursor) = engine
        .transactions_page("alice", 2, Some(&cursor), &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(rest.len(), 1);
    assert!(cursor.is_none());
}
