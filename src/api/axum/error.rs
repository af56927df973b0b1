use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::CommunityError;
use crate::api::ErrorResponse;

/// Converts [`CommunityError`] into an HTTP response.
#[derive(Debug)]
pub struct AppError(pub CommunityError);

impl From<CommunityError> for AppError {
    fn from(err: CommunityError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CommunityError::NotFound | CommunityError::EmptyDatabase => StatusCode::NOT_FOUND,
            CommunityError::PermissionDenied => StatusCode::FORBIDDEN,
            CommunityError::AlreadyExists
            | CommunityError::AlreadyMember
            | CommunityError::InvalidCategory(_)
            | CommunityError::TooManyTokens
            | CommunityError::InvalidTimestamp(_) => StatusCode::BAD_REQUEST,
            CommunityError::UserNotFound => StatusCode::UNAUTHORIZED,
            CommunityError::DatabaseError(_)
            | CommunityError::ConfigurationError(_)
            | CommunityError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError(CommunityError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError(CommunityError::PermissionDenied).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError(CommunityError::TooManyTokens).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError(CommunityError::UserNotFound).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError(CommunityError::Internal("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
