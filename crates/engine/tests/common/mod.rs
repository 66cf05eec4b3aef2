#![allow(dead_code)]

use chrono::Utc;
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Account, AccountKind, Engine, MoneyCents, NewAccountCmd, NewTransactionCmd, TransactionKind,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub async fn account(
    engine: &Engine,
    owner: &str,
    name: &str,
    kind: AccountKind,
    balance_minor: i64,
) -> Account {
    engine
        .new_account(NewAccountCmd {
            owner: owner.to_string(),
            name: name.to_string(),
            kind,
            currency: None,
            initial_balance: Some(MoneyCents::new(balance_minor)),
        })
        .await
        .unwrap()
}

pub fn tx_cmd(
    owner: &str,
    account_id: Uuid,
    kind: TransactionKind,
    amount_minor: i64,
) -> NewTransactionCmd {
    NewTransactionCmd {
        owner: owner.to_string(),
        account_id,
        to_account_id: None,
        kind,
        amount: MoneyCents::new(amount_minor),
        description: None,
        category_id: None,
        occurred_at: Utc::now(),
        tag_ids: Vec::new(),
    }
}

pub async fn balance_of(engine: &Engine, account_id: Uuid, owner: &str) -> i64 {
    engine.account(account_id, owner).await.unwrap().balance.cents()
}
