use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions};

use super::super::Engine;
use super::load_tag_ids;

const MAX_PAGE_SIZE: u64 = 200;

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, acts as an allow-list of kinds to return.
    pub kinds: Option<Vec<TransactionKind>>,
    /// Restricts to transactions touching this account (as source or
    /// destination).
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidInput(
            "invalid range: from must be < to".to_string(),
        ));
    }
    if filter.kinds.as_ref().is_some_and(|kinds| kinds.is_empty()) {
        return Err(EngineError::InvalidInput(
            "kinds must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn apply_tx_filters<Q: QueryFilter>(mut query: Q, filter: &TransactionListFilter) -> Q {
    if let Some(from) = filter.from {
        query = query.filter(transactions::Column::OccurredAt.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(transactions::Column::OccurredAt.lt(to));
    }
    if let Some(kinds) = &filter.kinds {
        let kinds: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();
        query = query.filter(transactions::Column::Kind.is_in(kinds));
    }
    if let Some(account_id) = filter.account_id {
        query = query.filter(
            Condition::any()
                .add(transactions::Column::AccountId.eq(account_id))
                .add(transactions::Column::ToAccountId.eq(account_id)),
        );
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(transactions::Column::CategoryId.eq(category_id));
    }
    query
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    occurred_at: DateTime<Utc>,
    transaction_id: Uuid,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

impl Engine {
    /// Lists the owner's transactions, newest first.
    pub async fn transactions(
        &self,
        owner: &str,
        limit: u64,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let (items, _next) = self.transactions_page(owner, limit, None, filter).await?;
        Ok(items)
    }

    /// Lists the owner's transactions with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(occurred_at DESC, id DESC)`.
    pub async fn transactions_page(
        &self,
        owner: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        validate_list_filter(filter)?;
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::Owner.eq(owner.to_string()));
        query = apply_tx_filters(query, filter);

        if let Some(cursor) = cursor {
            let cursor = TransactionsCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::OccurredAt.lt(cursor.occurred_at))
                    .add(
                        Condition::all()
                            .add(transactions::Column::OccurredAt.eq(cursor.occurred_at))
                            .add(transactions::Column::Id.lt(cursor.transaction_id)),
                    ),
            );
        }

        let mut models = query
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit + 1)
            .all(&self.database)
            .await?;

        let next_cursor = if models.len() as u64 > limit {
            models.truncate(limit as usize);
            models.last().map(|model| {
                TransactionsCursor {
                    occurred_at: model.occurred_at,
                    transaction_id: model.id,
                }
                .encode()
            })
        } else {
            None
        };
        let next_cursor = next_cursor.transpose()?;

        let ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
        let mut tags_by_tx = load_tag_ids(&self.database, &ids).await?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            let mut tx = Transaction::try_from(model)?;
            tx.tag_ids = tags_by_tx.remove(&tx.id).unwrap_or_default();
            items.push(tx);
        }

        Ok((items, next_cursor))
    }
}
