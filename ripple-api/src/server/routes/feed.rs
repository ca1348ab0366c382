use crate::server::{
    Result, ServerError, ServerRouter,
    extract::{Json, Query},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use ripple_common::{
    model::{Id, feed::FeedEntry, post::Post, post::PostMarker, user::UserMarker},
    page::{Page, PageRequest},
};
use ripple_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_user_feed)
        .typed_get(get_global_feed)
        .typed_get(get_follow_feed)
        .typed_delete(remove_seen_feeds)
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
struct UserFeedQuery {
    user_id: Id<UserMarker>,
    #[serde(default)]
    page: u32,
    size: Option<u32>,
}

impl UserFeedQuery {
    fn page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/feed", rejection(ServerError))]
struct GetUserFeedPath();

async fn get_user_feed(
    GetUserFeedPath(): GetUserFeedPath,
    Query(query): Query<UserFeedQuery>,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Page<FeedEntry>>> {
    let feed = db
        .fetch_user_feed(query.user_id, query.page_request())
        .await?
        .ok_or(ServerError::UserByIdNotFound(query.user_id))?;

    Ok(Json(feed))
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
struct GlobalFeedQuery {
    #[serde(default)]
    page: u32,
    size: Option<u32>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/feed/all", rejection(ServerError))]
struct GetGlobalFeedPath();

async fn get_global_feed(
    GetGlobalFeedPath(): GetGlobalFeedPath,
    Query(query): Query<GlobalFeedQuery>,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Page<Post>>> {
    let feed = db
        .fetch_global_feed(PageRequest::new(query.page, query.size))
        .await?;

    Ok(Json(feed))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/feed/follow", rejection(ServerError))]
struct GetFollowFeedPath();

async fn get_follow_feed(
    GetFollowFeedPath(): GetFollowFeedPath,
    Query(query): Query<UserFeedQuery>,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Page<Post>>> {
    let feed = db
        .fetch_follow_feed(query.user_id, query.page_request())
        .await?
        .ok_or(ServerError::UserByIdNotFound(query.user_id))?;

    Ok(Json(feed))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/feed/seen", rejection(ServerError))]
struct RemoveSeenFeedsPath();

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
struct SeenRequest {
    user_id: Id<UserMarker>,
    post_ids: Vec<Id<PostMarker>>,
}

async fn remove_seen_feeds(
    RemoveSeenFeedsPath(): RemoveSeenFeedsPath,
    State(db): State<Arc<DbClient>>,
    Json(request): Json<SeenRequest>,
) -> Result<StatusCode> {
    if request.post_ids.is_empty() {
        return Err(ServerError::EmptySeenList);
    }

    db.remove_seen_feeds(request.user_id, &request.post_ids)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
