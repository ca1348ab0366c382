use crate::server::ServerRouter;
use axum::Router;

mod feed;
mod follows;
mod likes;
mod posts;
mod users;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(feed::routes())
        .merge(follows::routes())
        .merge(likes::routes())
        .merge(posts::routes())
        .merge(users::routes())
}
