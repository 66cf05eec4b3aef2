//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionListQuery, TransactionListResponse, TransactionNew,
    TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn map_kind(kind: engine::TransactionKind) -> api_types::TransactionKind {
    match kind {
        engine::TransactionKind::Income => api_types::TransactionKind::Income,
        engine::TransactionKind::Expense => api_types::TransactionKind::Expense,
        engine::TransactionKind::Transfer => api_types::TransactionKind::Transfer,
    }
}

fn map_kind_in(kind: api_types::TransactionKind) -> engine::TransactionKind {
    match kind {
        api_types::TransactionKind::Income => engine::TransactionKind::Income,
        api_types::TransactionKind::Expense => engine::TransactionKind::Expense,
        api_types::TransactionKind::Transfer => engine::TransactionKind::Transfer,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        to_account_id: tx.to_account_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount.cents(),
        description: tx.description,
        category_id: tx.category_id,
        occurred_at: tx.occurred_at,
        tag_ids: tx.tag_ids,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .create_transaction(engine::NewTransactionCmd {
            owner: user.username,
            account_id: payload.account_id,
            to_account_id: payload.to_account_id,
            kind: map_kind_in(payload.kind),
            amount: engine::MoneyCents::new(payload.amount_minor),
            description: payload.description,
            category_id: payload.category_id,
            occurred_at: payload.occurred_at,
            tag_ids: payload.tag_ids.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id, &user.username).await?;
    Ok(Json(view(tx)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = engine::TransactionListFilter {
        from: query.from,
        to: query.to,
        kinds: query.kind.map(|kind| vec![map_kind_in(kind)]),
        account_id: query.account_id,
        category_id: query.category_id,
    };
    let limit = query.limit.unwrap_or(50);

    let (transactions, next_cursor) = state
        .engine
        .transactions_page(&user.username, limit, query.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
        next_cursor,
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_transaction(engine::UpdateTransactionCmd {
            transaction_id: id,
            owner: user.username,
            amount: payload.amount_minor.map(engine::MoneyCents::new),
            kind: payload.kind.map(map_kind_in),
            account_id: payload.account_id,
            to_account_id: payload.to_account_id,
            description: payload.description,
            category_id: payload.category_id,
            occurred_at: payload.occurred_at,
            tag_ids: payload.tag_ids,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
