//! Subscription API endpoints

use api_types::subscription::{
    DueRunResponse, ProcessDueRequest, SubscriptionListQuery, SubscriptionNew,
    SubscriptionProcessed, SubscriptionUpdate, SubscriptionView, SubscriptionsResponse,
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

fn map_frequency(frequency: engine::BillingFrequency) -> api_types::BillingFrequency {
    match frequency {
        engine::BillingFrequency::Weekly => api_types::BillingFrequency::Weekly,
        engine::BillingFrequency::Monthly => api_types::BillingFrequency::Monthly,
        engine::BillingFrequency::Quarterly => api_types::BillingFrequency::Quarterly,
        engine::BillingFrequency::Yearly => api_types::BillingFrequency::Yearly,
    }
}

fn map_frequency_in(frequency: api_types::BillingFrequency) -> engine::BillingFrequency {
    match frequency {
        api_types::BillingFrequency::Weekly => engine::BillingFrequency::Weekly,
        api_types::BillingFrequency::Monthly => engine::BillingFrequency::Monthly,
        api_types::BillingFrequency::Quarterly => engine::BillingFrequency::Quarterly,
        api_types::BillingFrequency::Yearly => engine::BillingFrequency::Yearly,
    }
}

fn map_status(status: engine::SubscriptionStatus) -> api_types::SubscriptionStatus {
    match status {
        engine::SubscriptionStatus::Active => api_types::SubscriptionStatus::Active,
        engine::SubscriptionStatus::Paused => api_types::SubscriptionStatus::Paused,
        engine::SubscriptionStatus::Cancelled => api_types::SubscriptionStatus::Cancelled,
    }
}

fn map_status_in(status: api_types::SubscriptionStatus) -> engine::SubscriptionStatus {
    match status {
        api_types::SubscriptionStatus::Active => engine::SubscriptionStatus::Active,
        api_types::SubscriptionStatus::Paused => engine::SubscriptionStatus::Paused,
        api_types::SubscriptionStatus::Cancelled => engine::SubscriptionStatus::Cancelled,
    }
}

fn view(subscription: engine::Subscription) -> SubscriptionView {
    let monthly = engine::monthly_equivalent(subscription.amount, subscription.frequency);
    SubscriptionView {
        id: subscription.id,
        name: subscription.name,
        amount_minor: subscription.amount.cents(),
        monthly_equivalent_minor: monthly.cents(),
        frequency: map_frequency(subscription.frequency),
        next_billing_date: subscription.next_billing_date,
        account_id: subscription.account_id,
        category_id: subscription.category_id,
        status: map_status(subscription.status),
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SubscriptionNew>,
) -> Result<(StatusCode, Json<SubscriptionView>), ServerError> {
    let subscription = state
        .engine
        .new_subscription(engine::NewSubscriptionCmd {
            owner: user.username,
            name: payload.name,
            amount: engine::MoneyCents::new(payload.amount_minor),
            frequency: map_frequency_in(payload.frequency),
            next_billing_date: payload.next_billing_date,
            account_id: payload.account_id,
            category_id: payload.category_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(subscription))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubscriptionView>, ServerError> {
    let subscription = state.engine.subscription(id, &user.username).await?;
    Ok(Json(view(subscription)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<Json<SubscriptionsResponse>, ServerError> {
    let subscriptions = state
        .engine
        .subscriptions(&user.username, query.status.map(map_status_in))
        .await?;
    Ok(Json(SubscriptionsResponse {
        subscriptions: subscriptions.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubscriptionUpdate>,
) -> Result<Json<SubscriptionView>, ServerError> {
    let subscription = state
        .engine
        .update_subscription(engine::UpdateSubscriptionCmd {
            subscription_id: id,
            owner: user.username,
            name: payload.name,
            amount: payload.amount_minor.map(engine::MoneyCents::new),
            frequency: payload.frequency.map(map_frequency_in),
            next_billing_date: payload.next_billing_date,
            account_id: payload.account_id,
            category_id: payload.category_id,
            status: payload.status.map(map_status_in),
        })
        .await?;
    Ok(Json(view(subscription)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_subscription(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn process(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubscriptionProcessed>, ServerError> {
    let processed = state
        .engine
        .process_subscription(id, &user.username, Utc::now())
        .await?;
    Ok(Json(SubscriptionProcessed {
        subscription_id: processed.subscription_id,
        transaction_id: processed.transaction_id,
        next_billing_date: processed.next_billing_date,
    }))
}

pub async fn process_due(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProcessDueRequest>,
) -> Result<Json<DueRunResponse>, ServerError> {
    let now = Utc::now();
    let as_of = payload.as_of.unwrap_or_else(|| now.date_naive());
    let report = state
        .engine
        .process_due_subscriptions(Some(&user.username), as_of, now)
        .await?;
    Ok(Json(DueRunResponse {
        processed: report.processed,
        failed: report.failed,
    }))
}
