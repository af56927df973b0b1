//! Body and path extractors that reject with the API's error envelope.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::api::ErrorResponse;

/// A request the router could not decode, such as malformed JSON or a
/// non-numeric id.
#[derive(Debug)]
pub struct InvalidRequest {
    status: StatusCode,
    message: String,
}

impl InvalidRequest {
    pub const CODE: &'static str = "INVALID_REQUEST";

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for InvalidRequest {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for InvalidRequest {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for InvalidRequest {
    fn into_response(self) -> Response {
        log::debug!(
            target: "townhall",
            "msg=\"request rejected\", status={}, error=\"{}\"",
            self.status.as_u16(),
            self.message
        );

        let body = ErrorResponse {
            error: self.message,
            code: Self::CODE.to_owned(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// [`Json`] with an [`InvalidRequest`] rejection.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InvalidRequest;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        Ok(Self(value))
    }
}

/// [`Path`] with an [`InvalidRequest`] rejection.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = InvalidRequest;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
