use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

mod accounts;
mod categories;
mod crypto;
mod debts;
pub(crate) mod statistics;
mod subscriptions;
mod tags;
mod transactions;

pub use crypto::SoldHolding;
pub use debts::SettledDebt;
pub use subscriptions::{DueRunReport, ProcessedSubscription};
pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

/// Loads an account and checks it belongs to `owner`.
pub(crate) async fn require_account(
    db: &impl ConnectionTrait,
    account_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::accounts::Model> {
    let model = crate::accounts::Entity::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("account not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "account belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

pub(crate) async fn require_transaction(
    db: &impl ConnectionTrait,
    transaction_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::transactions::Model> {
    let model = crate::transactions::Entity::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("transaction not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "transaction belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

pub(crate) async fn require_category(
    db: &impl ConnectionTrait,
    category_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::categories::Model> {
    let model = crate::categories::Entity::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("category not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "category belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

pub(crate) async fn require_tag(
    db: &impl ConnectionTrait,
    tag_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::tags::Model> {
    let model = crate::tags::Entity::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("tag not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "tag belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

pub(crate) async fn require_debt(
    db: &impl ConnectionTrait,
    debt_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::debts::Model> {
    let model = crate::debts::Entity::find_by_id(debt_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("debt not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "debt belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

pub(crate) async fn require_subscription(
    db: &impl ConnectionTrait,
    subscription_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::subscriptions::Model> {
    let model = crate::subscriptions::Entity::find_by_id(subscription_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("subscription not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "subscription belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

pub(crate) async fn require_holding(
    db: &impl ConnectionTrait,
    holding_id: Uuid,
    owner: &str,
) -> ResultEngine<crate::crypto_holdings::Model> {
    let model = crate::crypto_holdings::Entity::find_by_id(holding_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::NotFound("holding not exists".to_string()))?;
    if model.owner != owner {
        return Err(EngineError::Forbidden(
            "holding belongs to another user".to_string(),
        ));
    }
    Ok(model)
}
