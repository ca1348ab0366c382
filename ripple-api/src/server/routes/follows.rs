use crate::server::{Result, ServerError, ServerRouter, extract::Json};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use ripple_common::model::{Id, follow::FollowToggle, user::UserMarker};
use ripple_db::{ToggleFollow, client::DbClient};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(toggle_follow)
        .typed_get(get_following)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/follows/toggle", rejection(ServerError))]
struct ToggleFollowPath();

#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
struct ToggleFollowRequest {
    follower_id: Id<UserMarker>,
    followed_id: Id<UserMarker>,
}

async fn toggle_follow(
    ToggleFollowPath(): ToggleFollowPath,
    State(db): State<Arc<DbClient>>,
    Json(request): Json<ToggleFollowRequest>,
) -> Result<Json<FollowToggle>> {
    if request.follower_id == request.followed_id {
        return Err(ServerError::SelfFollow(request.follower_id));
    }

    match db
        .toggle_follow(request.follower_id, request.followed_id)
        .await?
    {
        ToggleFollow::UserNotFound(id) => Err(ServerError::UserByIdNotFound(id)),
        ToggleFollow::Followed => Ok(Json(FollowToggle { following: true })),
        ToggleFollow::Unfollowed => Ok(Json(FollowToggle { following: false })),
    }
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/follows/following/{user_id}", rejection(ServerError))]
struct GetFollowingPath {
    user_id: Id<UserMarker>,
}

async fn get_following(
    GetFollowingPath { user_id }: GetFollowingPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Vec<Id<UserMarker>>>> {
    db.fetch_active_user(user_id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(user_id))?;

    let following = db.fetch_followed_ids(user_id).await?;

    Ok(Json(following))
}
