use crate::server::{
    Result, ServerError, ServerRouter,
    extract::{Json, Query},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use ripple_common::model::{Id, like::LikeToggle, post::PostMarker, user::UserMarker};
use ripple_db::{ToggleLike, client::DbClient};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(toggle_like)
        .typed_get(get_like_count)
        .typed_get(get_liked_by)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/likes/toggle", rejection(ServerError))]
struct ToggleLikePath();

#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
struct ToggleLikeRequest {
    user_id: Id<UserMarker>,
    post_id: Id<PostMarker>,
}

async fn toggle_like(
    ToggleLikePath(): ToggleLikePath,
    State(db): State<Arc<DbClient>>,
    Json(request): Json<ToggleLikeRequest>,
) -> Result<Json<LikeToggle>> {
    match db.toggle_like(request.user_id, request.post_id).await? {
        ToggleLike::UserNotFound => Err(ServerError::UserByIdNotFound(request.user_id)),
        ToggleLike::PostNotFound => Err(ServerError::PostByIdNotFound(request.post_id)),
        ToggleLike::Completed(toggle) => Ok(Json(toggle)),
    }
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/likes/count/{post_id}", rejection(ServerError))]
struct GetLikeCountPath {
    post_id: Id<PostMarker>,
}

async fn get_like_count(
    GetLikeCountPath { post_id }: GetLikeCountPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<i64>> {
    let count = db.fetch_like_count(post_id).await?;

    Ok(Json(count))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/likes/liked/{post_id}", rejection(ServerError))]
struct GetLikedByPath {
    post_id: Id<PostMarker>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
struct LikedByQuery {
    user_id: Id<UserMarker>,
}

async fn get_liked_by(
    GetLikedByPath { post_id }: GetLikedByPath,
    Query(query): Query<LikedByQuery>,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<bool>> {
    let liked = db.is_liked_by(query.user_id, post_id).await?;

    Ok(Json(liked))
}
