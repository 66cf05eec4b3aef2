use chrono::Utc;
use engine::{
    AccountKind, EngineError, MoneyCents, NewDebtCmd, SettleDebtCmd, TransactionKind,
    UpdateDebtCmd,
};

mod common;
use common::{account, balance_of, engine_with_db};

fn debt_cmd(owner: &str, person: &str, amount_minor: i64) -> NewDebtCmd {
    NewDebtCmd {
        owner: owner.to_string(),
        person_name: person.to_string(),
        amount: MoneyCents::new(amount_minor),
    }
}

fn settle_cmd(debt_id: uuid::Uuid, owner: &str, account_id: uuid::Uuid) -> SettleDebtCmd {
    SettleDebtCmd {
        debt_id,
        owner: owner.to_string(),
        account_id,
        category_id: None,
        paid_at: Utc::now(),
    }
}

#[tokio::test]
async fn settle_books_income_and_marks_paid() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let debt = engine.new_debt(debt_cmd("alice", "Bob", 50_00)).await.unwrap();

    let settled = engine
        .settle_debt(settle_cmd(debt.id, "alice", checking.id))
        .await
        .unwrap();

    assert!(settled.debt.is_paid);
    assert!(settled.debt.paid_at.is_some());
    assert_eq!(settled.debt.transaction_id, Some(settled.transaction_id));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 150_00);

    let tx = engine
        .transaction(settled.transaction_id, "alice")
        .await
        .unwrap();
    assert_eq!(tx.kind, TransactionKind::Income);
    assert_eq!(tx.amount.cents(), 50_00);
    assert_eq!(tx.account_id, checking.id);
}

#[tokio::test]
async fn settling_twice_is_a_conflict() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let debt = engine.new_debt(debt_cmd("alice", "Bob", 50_00)).await.unwrap();

    engine
        .settle_debt(settle_cmd(debt.id, "alice", checking.id))
        .await
        .unwrap();
    let err = engine
        .settle_debt(settle_cmd(debt.id, "alice", checking.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadySettled(_)));

    // Nothing moved the second time.
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 150_00);
}

#[tokio::test]
async fn settle_rejects_foreign_debt_and_account() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let debt = engine.new_debt(debt_cmd("bob", "Carol", 25_00)).await.unwrap();

    let err = engine
        .settle_debt(settle_cmd(debt.id, "alice", checking.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Bob cannot settle into Alice's account either.
    let err = engine
        .settle_debt(settle_cmd(debt.id, "bob", checking.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(balance_of(&engine, checking.id, "alice").await, 100_00);
}

#[tokio::test]
async fn paid_debts_are_immutable() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let debt = engine.new_debt(debt_cmd("alice", "Bob", 50_00)).await.unwrap();
    engine
        .settle_debt(settle_cmd(debt.id, "alice", checking.id))
        .await
        .unwrap();

    let err = engine
        .update_debt(UpdateDebtCmd {
            debt_id: debt.id,
            owner: "alice".to_string(),
            person_name: None,
            amount: Some(MoneyCents::new(99_00)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadySettled(_)));

    let err = engine.delete_debt(debt.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::AlreadySettled(_)));
}
