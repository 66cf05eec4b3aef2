//! Category API endpoints

use api_types::category::{CategoriesResponse, CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn map_kind(kind: engine::CategoryKind) -> api_types::CategoryKind {
    match kind {
        engine::CategoryKind::Expense => api_types::CategoryKind::Expense,
        engine::CategoryKind::Income => api_types::CategoryKind::Income,
    }
}

fn map_kind_in(kind: api_types::CategoryKind) -> engine::CategoryKind {
    match kind {
        api_types::CategoryKind::Expense => engine::CategoryKind::Expense,
        api_types::CategoryKind::Income => engine::CategoryKind::Income,
    }
}

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        parent_id: category.parent_id,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .new_category(engine::NewCategoryCmd {
            owner: user.username,
            name: payload.name,
            kind: map_kind_in(payload.kind),
            parent_id: payload.parent_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(id, &user.username).await?;
    Ok(Json(view(category)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let categories = state.engine.categories(&user.username).await?;
    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(engine::UpdateCategoryCmd {
            category_id: id,
            owner: user.username,
            name: payload.name,
            parent_id: payload.parent_id,
            clear_parent: payload.clear_parent,
        })
        .await?;
    Ok(Json(view(category)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
