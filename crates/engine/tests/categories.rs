use engine::{
    AccountKind, CategoryKind, EngineError, NewCategoryCmd, TransactionKind, UpdateCategoryCmd,
};

mod common;
use common::{account, engine_with_db, tx_cmd};

fn category_cmd(owner: &str, name: &str, kind: CategoryKind) -> NewCategoryCmd {
    NewCategoryCmd {
        owner: owner.to_string(),
        name: name.to_string(),
        kind,
        parent_id: None,
    }
}

#[tokio::test]
async fn transaction_category_kind_must_match() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let salary = engine
        .new_category(category_cmd("alice", "Salary", CategoryKind::Income))
        .await
        .unwrap();

    let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Expense, 10_00);
    cmd.category_id = Some(salary.id);
    let err = engine.create_transaction(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn parent_must_share_kind_and_owner() {
    let engine = engine_with_db().await;
    let food = engine
        .new_category(category_cmd("alice", "Food", CategoryKind::Expense))
        .await
        .unwrap();

    let mut cmd = category_cmd("alice", "Salary", CategoryKind::Income);
    cmd.parent_id = Some(food.id);
    let err = engine.new_category(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let mut cmd = category_cmd("mallory", "Groceries", CategoryKind::Expense);
    cmd.parent_id = Some(food.id);
    let err = engine.new_category(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn reparent_cannot_create_cycle() {
    let engine = engine_with_db().await;
    let food = engine
        .new_category(category_cmd("alice", "Food", CategoryKind::Expense))
        .await
        .unwrap();
    let mut cmd = category_cmd("alice", "Groceries", CategoryKind::Expense);
    cmd.parent_id = Some(food.id);
    let groceries = engine.new_category(cmd).await.unwrap();

    // food under groceries would close food -> groceries -> food.
    let err = engine
        .update_category(UpdateCategoryCmd {
            category_id: food.id,
            owner: "alice".to_string(),
            name: None,
            parent_id: Some(groceries.id),
            clear_parent: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let err = engine
        .update_category(UpdateCategoryCmd {
            category_id: food.id,
            owner: "alice".to_string(),
            name: None,
            parent_id: Some(food.id),
            clear_parent: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn delete_blocked_while_children_exist() {
    let engine = engine_with_db().await;
    let food = engine
        .new_category(category_cmd("alice", "Food", CategoryKind::Expense))
        .await
        .unwrap();
    let mut cmd = category_cmd("alice", "Groceries", CategoryKind::Expense);
    cmd.parent_id = Some(food.id);
    let groceries = engine.new_category(cmd).await.unwrap();

    let err = engine.delete_category(food.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.delete_category(groceries.id, "alice").await.unwrap();
    engine.delete_category(food.id, "alice").await.unwrap();
}

#[tokio::test]
async fn delete_detaches_transactions() {
    let engine = engine_with_db().await;
    let checking = account(&engine, "alice", "Checking", AccountKind::Checking, 100_00).await;
    let food = engine
        .new_category(category_cmd("alice", "Food", CategoryKind::Expense))
        .await
        .unwrap();

    let mut cmd = tx_cmd("alice", checking.id, TransactionKind::Expense, 10_00);
    cmd.category_id = Some(food.id);
    let tx_id = engine.create_transaction(cmd).await.unwrap();

    engine.delete_category(food.id, "alice").await.unwrap();

    let tx = engine.transaction(tx_id, "alice").await.unwrap();
    assert_eq!(tx.category_id, None);
}

#[tokio::test]
async fn duplicate_names_are_rejected_accent_insensitive() {
    let engine = engine_with_db().await;
    engine
        .new_category(category_cmd("alice", "Café", CategoryKind::Expense))
        .await
        .unwrap();

    let err = engine
        .new_category(category_cmd("alice", "cafe", CategoryKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Same name under a different owner is fine.
    engine
        .new_category(category_cmd("bob", "Cafe", CategoryKind::Expense))
        .await
        .unwrap();
}
