//! Crypto holding API endpoints

use api_types::crypto::{
    HoldingListQuery, HoldingNew, HoldingSell, HoldingSold, HoldingUpdate, HoldingView,
    HoldingsResponse,
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

fn map_status(status: engine::HoldingStatus) -> api_types::HoldingStatus {
    match status {
        engine::HoldingStatus::Active => api_types::HoldingStatus::Active,
        engine::HoldingStatus::Sold => api_types::HoldingStatus::Sold,
    }
}

fn map_status_in(status: api_types::HoldingStatus) -> engine::HoldingStatus {
    match status {
        api_types::HoldingStatus::Active => engine::HoldingStatus::Active,
        api_types::HoldingStatus::Sold => engine::HoldingStatus::Sold,
    }
}

fn view(holding: engine::CryptoHolding) -> HoldingView {
    let current_value_minor =
        (holding.quantity * holding.current_price.cents() as f64).round() as i64;
    HoldingView {
        id: holding.id,
        symbol: holding.symbol,
        quantity: holding.quantity,
        purchase_price_minor: holding.purchase_price.cents(),
        current_price_minor: holding.current_price.cents(),
        current_value_minor,
        purchase_transaction_id: holding.purchase_transaction_id,
        sale_transaction_id: holding.sale_transaction_id,
        status: map_status(holding.status),
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<HoldingNew>,
) -> Result<(StatusCode, Json<HoldingView>), ServerError> {
    let holding = state
        .engine
        .new_holding(engine::NewHoldingCmd {
            owner: user.username,
            symbol: payload.symbol,
            quantity: payload.quantity,
            purchase_price: engine::MoneyCents::new(payload.purchase_price_minor),
            account_id: payload.account_id,
            category_id: payload.category_id,
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(holding))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HoldingView>, ServerError> {
    let holding = state.engine.holding(id, &user.username).await?;
    Ok(Json(view(holding)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<HoldingListQuery>,
) -> Result<Json<HoldingsResponse>, ServerError> {
    let holdings = state
        .engine
        .holdings(&user.username, query.status.map(map_status_in))
        .await?;
    Ok(Json(HoldingsResponse {
        holdings: holdings.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HoldingUpdate>,
) -> Result<Json<HoldingView>, ServerError> {
    let holding = state
        .engine
        .update_holding(engine::UpdateHoldingCmd {
            holding_id: id,
            owner: user.username,
            quantity: payload.quantity,
            purchase_price: payload.purchase_price_minor.map(engine::MoneyCents::new),
            current_price: payload.current_price_minor.map(engine::MoneyCents::new),
        })
        .await?;
    Ok(Json(view(holding)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_holding(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sell(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HoldingSell>,
) -> Result<Json<HoldingSold>, ServerError> {
    let sold = state
        .engine
        .sell_holding(engine::SellHoldingCmd {
            holding_id: id,
            owner: user.username,
            account_id: payload.account_id,
            sale_price: engine::MoneyCents::new(payload.sale_price_minor),
            category_id: payload.category_id,
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
        })
        .await?;
    Ok(Json(HoldingSold {
        holding: view(sold.holding),
        transaction_id: sold.transaction_id,
    }))
}
