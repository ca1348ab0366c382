use crate::server::{Result, ServerError, ServerRouter, extract::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use ripple_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
};
use ripple_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_post)
        .typed_post(create_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct GetPostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    GetPostPath { id }: GetPostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let post = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct CreatePostPath();

async fn create_post(
    CreatePostPath(): CreatePostPath,
    State(db): State<Arc<DbClient>>,
    Json(request): Json<CreatePost>,
) -> Result<Json<Post>> {
    let post_id = db
        .create_post(&request)
        .await?
        .ok_or(ServerError::UserByIdNotFound(request.author_id))?;

    let post = db
        .fetch_post(post_id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(post_id))?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct DeletePostPath {
    id: Id<PostMarker>,
}

async fn delete_post(
    DeletePostPath { id }: DeletePostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<StatusCode> {
    let deleted = db.soft_delete_post(id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::PostByIdNotFound(id))
    }
}
