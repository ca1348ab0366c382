use crate::server::ServerError;
use axum::{
    Json as AxumJson,
    extract::{FromRequest, FromRequestParts, Query as AxumQuery},
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::ContentType;
use serde::Serialize;

/// JSON body wrapper whose extraction failures surface as [`ServerError`]
/// instead of axum's default rejection, so every malformed request is
/// answered in the error shape of this server.
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumJson), rejection(ServerError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.0) {
            Ok(body) => body,
            Err(err) => return ServerError::JsonResponse(err).into_response(),
        };

        (TypedHeader(ContentType::json()), body).into_response()
    }
}

/// Query-string counterpart of [`Json`].
#[derive(FromRequestParts, Debug, Clone, Copy, Default)]
#[from_request(via(AxumQuery), rejection(ServerError))]
pub struct Query<T>(pub T);

#[cfg(test)]
mod tests {
    use crate::server::extract::Json;
    use axum::{
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };

    #[test]
    fn json_response_is_marked_as_json() {
        let response = Json(vec![1, 2, 3]).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
    }
}
