use crate::server::{Result, ServerError, ServerRouter, extract::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use ripple_common::model::{
    Id,
    user::{CreateUser, User, UserMarker},
};
use ripple_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_user)
        .typed_post(create_user)
        .typed_delete(delete_user)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}", rejection(ServerError))]
struct GetUserPath {
    id: Id<UserMarker>,
}

async fn get_user(
    GetUserPath { id }: GetUserPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<User>> {
    let user = db
        .fetch_active_user(id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    Ok(Json(user))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users", rejection(ServerError))]
struct CreateUserPath();

async fn create_user(
    CreateUserPath(): CreateUserPath,
    State(db): State<Arc<DbClient>>,
    Json(request): Json<CreateUser>,
) -> Result<Json<User>> {
    let id = db.create_user(&request).await?;

    Ok(Json(User {
        id,
        handle: request.handle,
    }))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}", rejection(ServerError))]
struct DeleteUserPath {
    id: Id<UserMarker>,
}

async fn delete_user(
    DeleteUserPath { id }: DeleteUserPath,
    State(db): State<Arc<DbClient>>,
) -> Result<StatusCode> {
    let deleted = db.soft_delete_user(id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::UserByIdNotFound(id))
    }
}
