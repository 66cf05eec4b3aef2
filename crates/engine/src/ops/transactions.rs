//! Transaction use-cases: the operations that move account balances.
//!
//! Every write computes the signed per-account deltas of the affected
//! transaction(s), previews the resulting balances inside the open store
//! transaction, validates them, and persists a single balance write per
//! account. Reversal and reapplication on update are merged into one delta
//! map, so no intermediate state is ever observable.

use std::collections::HashMap;

use sea_orm::{ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    AccountKind, EngineError, ResultEngine, Transaction, TransactionKind, accounts, categories,
    transaction_tags, transactions,
};

use super::{Engine, require_account, require_category, require_tag, require_transaction};

mod list;
mod write;

pub use list::TransactionListFilter;

/// Signed per-account balance deltas produced by a transaction.
fn balance_effects(
    kind: TransactionKind,
    amount_minor: i64,
    account_id: Uuid,
    to_account_id: Option<Uuid>,
) -> Vec<(Uuid, i64)> {
    match kind {
        TransactionKind::Income => vec![(account_id, amount_minor)],
        TransactionKind::Expense => vec![(account_id, -amount_minor)],
        TransactionKind::Transfer => {
            let mut effects = vec![(account_id, -amount_minor)];
            if let Some(to_account_id) = to_account_id {
                effects.push((to_account_id, amount_minor));
            }
            effects
        }
    }
}

pub(in crate::ops) struct BalancePreview {
    account_id: Uuid,
    name: String,
    kind: AccountKind,
    new_balance_minor: i64,
}

/// Loads every affected account and computes its post-write balance.
pub(in crate::ops) async fn preview_account_deltas(
    db_tx: &DatabaseTransaction,
    owner: &str,
    deltas: &HashMap<Uuid, i64>,
) -> ResultEngine<Vec<BalancePreview>> {
    let mut previews = Vec::with_capacity(deltas.len());
    for (account_id, delta_minor) in deltas {
        let model = require_account(db_tx, *account_id, owner).await?;
        let kind = AccountKind::try_from(model.kind.as_str())?;
        let new_balance_minor = model
            .balance_minor
            .checked_add(*delta_minor)
            .ok_or_else(|| EngineError::InvalidInput("balance overflow".to_string()))?;
        previews.push(BalancePreview {
            account_id: *account_id,
            name: model.name,
            kind,
            new_balance_minor,
        });
    }
    Ok(previews)
}

/// Rejects balances that would drop below zero.
///
/// Credit cards are exempt, except as the source of a transfer.
pub(in crate::ops) fn check_balance_floors(
    previews: &[BalancePreview],
    transfer_source: Option<Uuid>,
) -> ResultEngine<()> {
    for preview in previews {
        let exempt =
            preview.kind.allows_negative_balance() && Some(preview.account_id) != transfer_source;
        if !exempt && preview.new_balance_minor < 0 {
            return Err(EngineError::InsufficientFunds(format!(
                "account '{}' would go negative",
                preview.name
            )));
        }
    }
    Ok(())
}

/// Writes the previewed balances, one update per account.
pub(in crate::ops) async fn persist_account_balances(
    db_tx: &DatabaseTransaction,
    previews: Vec<BalancePreview>,
) -> ResultEngine<()> {
    for preview in previews {
        let model = accounts::ActiveModel {
            id: ActiveValue::Set(preview.account_id),
            balance_minor: ActiveValue::Set(preview.new_balance_minor),
            ..Default::default()
        };
        model.update(db_tx).await?;
    }
    Ok(())
}

fn ensure_account_active(model: &accounts::Model) -> ResultEngine<()> {
    if !model.active {
        return Err(EngineError::Conflict(format!(
            "account '{}' is inactive",
            model.name
        )));
    }
    Ok(())
}

fn ensure_category_matches(
    kind: TransactionKind,
    category: &categories::Model,
) -> ResultEngine<()> {
    let expected = match kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
        TransactionKind::Transfer => {
            return Err(EngineError::InvalidInput(
                "transfers cannot carry a category".to_string(),
            ));
        }
    };
    if category.kind != expected {
        return Err(EngineError::InvalidInput(format!(
            "category '{}' is not an {expected} category",
            category.name
        )));
    }
    Ok(())
}

/// Validates a fully built transaction against the store and inserts it
/// together with its tag rows and balance writes.
///
/// Shared by direct creation, debt settlement, subscription processing, and
/// crypto buy/sell. Must run inside an open store transaction.
pub(in crate::ops) async fn insert_transaction_with_effects(
    db_tx: &DatabaseTransaction,
    tx: &Transaction,
) -> ResultEngine<Uuid> {
    let source = require_account(db_tx, tx.account_id, &tx.owner).await?;
    ensure_account_active(&source)?;

    match tx.kind {
        TransactionKind::Transfer => {
            let to_account_id = tx.to_account_id.ok_or_else(|| {
                EngineError::InvalidInput("transfer requires a destination account".to_string())
            })?;
            if to_account_id == tx.account_id {
                return Err(EngineError::Conflict(
                    "transfer source and destination must differ".to_string(),
                ));
            }
            let destination = require_account(db_tx, to_account_id, &tx.owner).await?;
            ensure_account_active(&destination)?;
        }
        TransactionKind::Income | TransactionKind::Expense => {
            if tx.to_account_id.is_some() {
                return Err(EngineError::InvalidInput(
                    "to_account_id is only valid for transfers".to_string(),
                ));
            }
        }
    }

    if let Some(category_id) = tx.category_id {
        let category = require_category(db_tx, category_id, &tx.owner).await?;
        ensure_category_matches(tx.kind, &category)?;
    }
    for tag_id in &tx.tag_ids {
        require_tag(db_tx, *tag_id, &tx.owner).await?;
    }

    let mut deltas: HashMap<Uuid, i64> = HashMap::new();
    for (account_id, delta_minor) in
        balance_effects(tx.kind, tx.amount.cents(), tx.account_id, tx.to_account_id)
    {
        *deltas.entry(account_id).or_insert(0) += delta_minor;
    }
    let previews = preview_account_deltas(db_tx, &tx.owner, &deltas).await?;
    let transfer_source = (tx.kind == TransactionKind::Transfer).then_some(tx.account_id);
    check_balance_floors(&previews, transfer_source)?;

    transactions::ActiveModel::from(tx).insert(db_tx).await?;
    for tag_id in &tx.tag_ids {
        let join = transaction_tags::ActiveModel {
            transaction_id: ActiveValue::Set(tx.id),
            tag_id: ActiveValue::Set(*tag_id),
        };
        join.insert(db_tx).await?;
    }
    persist_account_balances(db_tx, previews).await?;

    Ok(tx.id)
}

/// Loads the tag ids attached to each of the given transactions.
pub(in crate::ops) async fn load_tag_ids(
    db: &impl ConnectionTrait,
    transaction_ids: &[Uuid],
) -> ResultEngine<HashMap<Uuid, Vec<Uuid>>> {
    if transaction_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = transaction_tags::Entity::find()
        .filter(transaction_tags::Column::TransactionId.is_in(transaction_ids.to_vec()))
        .all(db)
        .await?;
    let mut by_transaction: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        by_transaction
            .entry(row.transaction_id)
            .or_default()
            .push(row.tag_id);
    }
    Ok(by_transaction)
}

impl Engine {
    /// Fetches a single transaction with its tags.
    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        owner: &str,
    ) -> ResultEngine<Transaction> {
        let model = require_transaction(&self.database, transaction_id, owner).await?;
        let mut tx = Transaction::try_from(model)?;
        tx.tag_ids = load_tag_ids(&self.database, &[transaction_id])
            .await?
            .remove(&transaction_id)
            .unwrap_or_default();
        Ok(tx)
    }
}
