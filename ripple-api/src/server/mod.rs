use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use extract::Json;
use ripple_common::model::{Id, post::PostMarker, user::UserMarker};
use ripple_db::client::{DbClient, DbError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod extract;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Query string rejected: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
    #[error("User with id {0} was not found.")]
    UserByIdNotFound(Id<UserMarker>),
    #[error("The list of seen post ids must not be empty.")]
    EmptySeenList,
    #[error("User {0} cannot follow themselves.")]
    SelfFollow(Id<UserMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_)
            | ServerError::UserByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::QueryRejection(_)
            | ServerError::JsonRejection(_)
            | ServerError::EmptySeenList
            | ServerError::SelfFollow(_) => StatusCode::BAD_REQUEST,
            // Lock-wait expiry is retryable; tell the caller to back off.
            ServerError::Database(DbError::LockWaitTimeout) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Database(err) if err.is_unique_violation() => StatusCode::CONFLICT,
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
        };
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::ServerError;
    use axum::http::{StatusCode, Uri};
    use ripple_common::model::Id;
    use ripple_db::client::DbError;

    #[test]
    fn not_found_statuses() {
        assert_eq!(
            ServerError::UnknownRoute(Uri::from_static("/nope")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::PostByIdNotFound(Id::new(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::UserByIdNotFound(Id::new(1)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn validation_statuses() {
        assert_eq!(ServerError::EmptySeenList.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::SelfFollow(Id::new(5)).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn lock_timeout_is_retryable() {
        assert_eq!(
            ServerError::Database(DbError::LockWaitTimeout).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn other_database_errors_are_internal() {
        assert_eq!(
            ServerError::Database(DbError::Sqlx(sqlx::Error::PoolTimedOut)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
