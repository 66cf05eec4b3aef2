//! Account API endpoints

use api_types::account::{
    AccountListQuery, AccountNew, AccountUpdate, AccountView, AccountsResponse,
    TotalBalanceResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn map_kind(kind: engine::AccountKind) -> api_types::AccountKind {
    match kind {
        engine::AccountKind::Checking => api_types::AccountKind::Checking,
        engine::AccountKind::Savings => api_types::AccountKind::Savings,
        engine::AccountKind::CreditCard => api_types::AccountKind::CreditCard,
        engine::AccountKind::Investment => api_types::AccountKind::Investment,
        engine::AccountKind::Cash => api_types::AccountKind::Cash,
        engine::AccountKind::Other => api_types::AccountKind::Other,
    }
}

fn map_kind_in(kind: api_types::AccountKind) -> engine::AccountKind {
    match kind {
        api_types::AccountKind::Checking => engine::AccountKind::Checking,
        api_types::AccountKind::Savings => engine::AccountKind::Savings,
        api_types::AccountKind::CreditCard => engine::AccountKind::CreditCard,
        api_types::AccountKind::Investment => engine::AccountKind::Investment,
        api_types::AccountKind::Cash => engine::AccountKind::Cash,
        api_types::AccountKind::Other => engine::AccountKind::Other,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: map_kind(account.kind),
        balance_minor: account.balance.cents(),
        currency: account.currency,
        active: account.active,
        created_at: account.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .new_account(engine::NewAccountCmd {
            owner: user.username,
            name: payload.name,
            kind: map_kind_in(payload.kind),
            currency: payload.currency,
            initial_balance: payload.initial_balance_minor.map(engine::MoneyCents::new),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(account))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(id, &user.username).await?;
    Ok(Json(view(account)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<AccountListQuery>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let accounts = state
        .engine
        .accounts(&user.username, query.include_inactive.unwrap_or(false))
        .await?;
    Ok(Json(AccountsResponse {
        accounts: accounts.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_account(engine::UpdateAccountCmd {
            account_id: id,
            owner: user.username,
            name: payload.name,
            kind: payload.kind.map(map_kind_in),
            active: payload.active,
        })
        .await?;
    Ok(Json(view(account)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn total_balance(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TotalBalanceResponse>, ServerError> {
    let total = state.engine.total_balance(&user.username).await?;
    Ok(Json(TotalBalanceResponse {
        total_minor: total.cents(),
    }))
}
