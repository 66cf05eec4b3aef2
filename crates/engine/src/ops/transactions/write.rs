use std::collections::HashMap;

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransactionCmd, ResultEngine, Transaction, TransactionKind,
    UpdateTransactionCmd, transaction_tags, transactions, util,
};

use super::super::{
    Engine, require_account, require_category, require_tag, require_transaction, with_tx,
};
use super::{
    balance_effects, check_balance_floors, insert_transaction_with_effects,
    persist_account_balances, preview_account_deltas,
};

impl Engine {
    /// Creates an income, expense, or transfer transaction and applies its
    /// effect to the affected account balance(s).
    ///
    /// Validation happens before any write: ownership, active accounts,
    /// matching category kind, sufficient funds. Nothing is persisted when a
    /// check fails.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Uuid> {
        let mut tx = Transaction::new(
            cmd.owner,
            cmd.account_id,
            cmd.to_account_id,
            cmd.kind,
            cmd.amount,
            util::optional_text(cmd.description.as_deref()),
            cmd.category_id,
            cmd.occurred_at,
        )?;
        let mut tag_ids = cmd.tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();
        tx.tag_ids = tag_ids;

        with_tx!(self, |db_tx| {
            insert_transaction_with_effects(&db_tx, &tx).await
        })
    }

    /// Updates an existing transaction (amount, kind, accounts, metadata,
    /// tags).
    ///
    /// The original effect is reversed and the new effect applied as one
    /// merged set of per-account deltas inside a single store transaction,
    /// so concurrent readers never observe the intermediate reversal.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_transaction(&db_tx, cmd.transaction_id, &cmd.owner).await?;
            let old = Transaction::try_from(model)?;

            let new_kind = cmd.kind.unwrap_or(old.kind);
            let new_amount = cmd.amount.unwrap_or(old.amount);
            if !new_amount.is_positive() {
                return Err(EngineError::InvalidInput("amount must be > 0".to_string()));
            }
            let new_account_id = cmd.account_id.unwrap_or(old.account_id);
            let new_to_account_id = match new_kind {
                TransactionKind::Transfer => {
                    let to_account_id =
                        cmd.to_account_id.or(old.to_account_id).ok_or_else(|| {
                            EngineError::InvalidInput(
                                "transfer requires a destination account".to_string(),
                            )
                        })?;
                    if to_account_id == new_account_id {
                        return Err(EngineError::Conflict(
                            "transfer source and destination must differ".to_string(),
                        ));
                    }
                    Some(to_account_id)
                }
                TransactionKind::Income | TransactionKind::Expense => {
                    if cmd.to_account_id.is_some() {
                        return Err(EngineError::InvalidInput(
                            "to_account_id is only valid for transfers".to_string(),
                        ));
                    }
                    None
                }
            };

            let source = require_account(&db_tx, new_account_id, &cmd.owner).await?;
            super::ensure_account_active(&source)?;
            if let Some(to_account_id) = new_to_account_id {
                let destination = require_account(&db_tx, to_account_id, &cmd.owner).await?;
                super::ensure_account_active(&destination)?;
            }

            // A kind flip to transfer silently drops the category; the other
            // flips must be given a category of the right kind in the same
            // patch.
            let new_category_id = match new_kind {
                TransactionKind::Transfer => {
                    if cmd.category_id.is_some() {
                        return Err(EngineError::InvalidInput(
                            "transfers cannot carry a category".to_string(),
                        ));
                    }
                    None
                }
                _ => cmd.category_id.or(old.category_id),
            };
            if let Some(category_id) = new_category_id {
                let category = require_category(&db_tx, category_id, &cmd.owner).await?;
                super::ensure_category_matches(new_kind, &category)?;
            }

            let new_tag_ids = match cmd.tag_ids {
                Some(mut tag_ids) => {
                    tag_ids.sort_unstable();
                    tag_ids.dedup();
                    for tag_id in &tag_ids {
                        require_tag(&db_tx, *tag_id, &cmd.owner).await?;
                    }
                    Some(tag_ids)
                }
                None => None,
            };

            let new_description = match cmd.description {
                Some(description) => util::optional_text(Some(description.as_str())),
                None => old.description.clone(),
            };
            let new_occurred_at = cmd.occurred_at.unwrap_or(old.occurred_at);

            let mut deltas: HashMap<Uuid, i64> = HashMap::new();
            for (account_id, delta_minor) in
                balance_effects(old.kind, old.amount.cents(), old.account_id, old.to_account_id)
            {
                *deltas.entry(account_id).or_insert(0) -= delta_minor;
            }
            for (account_id, delta_minor) in balance_effects(
                new_kind,
                new_amount.cents(),
                new_account_id,
                new_to_account_id,
            ) {
                *deltas.entry(account_id).or_insert(0) += delta_minor;
            }
            deltas.retain(|_, delta_minor| *delta_minor != 0);

            let previews = preview_account_deltas(&db_tx, &cmd.owner, &deltas).await?;
            let transfer_source =
                (new_kind == TransactionKind::Transfer).then_some(new_account_id);
            check_balance_floors(&previews, transfer_source)?;

            let tx_active = transactions::ActiveModel {
                id: ActiveValue::Set(old.id),
                account_id: ActiveValue::Set(new_account_id),
                to_account_id: ActiveValue::Set(new_to_account_id),
                kind: ActiveValue::Set(new_kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(new_amount.cents()),
                description: ActiveValue::Set(new_description),
                category_id: ActiveValue::Set(new_category_id),
                occurred_at: ActiveValue::Set(new_occurred_at),
                ..Default::default()
            };
            tx_active.update(&db_tx).await?;

            if let Some(tag_ids) = new_tag_ids {
                transaction_tags::Entity::delete_many()
                    .filter(transaction_tags::Column::TransactionId.eq(old.id))
                    .exec(&db_tx)
                    .await?;
                for tag_id in tag_ids {
                    let join = transaction_tags::ActiveModel {
                        transaction_id: ActiveValue::Set(old.id),
                        tag_id: ActiveValue::Set(tag_id),
                    };
                    join.insert(&db_tx).await?;
                }
            }

            persist_account_balances(&db_tx, previews).await?;
            Ok(())
        })
    }

    /// Deletes a transaction, reversing its effect symmetrically to create.
    ///
    /// Reversal is unconditional: no balance floor applies when undoing an
    /// effect.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        owner: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_transaction(&db_tx, transaction_id, owner).await?;
            let tx = Transaction::try_from(model)?;

            let mut deltas: HashMap<Uuid, i64> = HashMap::new();
            for (account_id, delta_minor) in
                balance_effects(tx.kind, tx.amount.cents(), tx.account_id, tx.to_account_id)
            {
                *deltas.entry(account_id).or_insert(0) -= delta_minor;
            }
            deltas.retain(|_, delta_minor| *delta_minor != 0);
            let previews = preview_account_deltas(&db_tx, owner, &deltas).await?;

            transaction_tags::Entity::delete_many()
                .filter(transaction_tags::Column::TransactionId.eq(transaction_id))
                .exec(&db_tx)
                .await?;
            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            persist_account_balances(&db_tx, previews).await?;
            Ok(())
        })
    }
}
