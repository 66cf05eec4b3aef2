//! Debt API endpoints

use api_types::debt::{
    DebtListQuery, DebtNew, DebtSettle, DebtSettled, DebtUpdate, DebtView, DebtsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn view(debt: engine::Debt) -> DebtView {
    DebtView {
        id: debt.id,
        person_name: debt.person_name,
        amount_minor: debt.amount.cents(),
        is_paid: debt.is_paid,
        paid_at: debt.paid_at,
        transaction_id: debt.transaction_id,
        created_at: debt.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<DebtView>), ServerError> {
    let debt = state
        .engine
        .new_debt(engine::NewDebtCmd {
            owner: user.username,
            person_name: payload.person_name,
            amount: engine::MoneyCents::new(payload.amount_minor),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(debt))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state.engine.debt(id, &user.username).await?;
    Ok(Json(view(debt)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<DebtListQuery>,
) -> Result<Json<DebtsResponse>, ServerError> {
    let debts = state.engine.debts(&user.username, query.is_paid).await?;
    Ok(Json(DebtsResponse {
        debts: debts.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtUpdate>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state
        .engine
        .update_debt(engine::UpdateDebtCmd {
            debt_id: id,
            owner: user.username,
            person_name: payload.person_name,
            amount: payload.amount_minor.map(engine::MoneyCents::new),
        })
        .await?;
    Ok(Json(view(debt)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_debt(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn settle(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtSettle>,
) -> Result<Json<DebtSettled>, ServerError> {
    let settled = state
        .engine
        .settle_debt(engine::SettleDebtCmd {
            debt_id: id,
            owner: user.username,
            account_id: payload.account_id,
            category_id: payload.category_id,
            paid_at: payload.paid_at.unwrap_or_else(Utc::now),
        })
        .await?;
    Ok(Json(DebtSettled {
        debt: view(settled.debt),
        transaction_id: settled.transaction_id,
    }))
}
