//! Tag API endpoints

use api_types::tag::{TagNew, TagView, TagsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn view(tag: engine::Tag) -> TagView {
    TagView {
        id: tag.id,
        name: tag.name,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TagNew>,
) -> Result<(StatusCode, Json<TagView>), ServerError> {
    let tag = state.engine.new_tag(&user.username, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(view(tag))))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TagsResponse>, ServerError> {
    let tags = state.engine.tags(&user.username).await?;
    Ok(Json(TagsResponse {
        tags: tags.into_iter().map(view).collect(),
    }))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_tag(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
