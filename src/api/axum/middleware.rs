use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::error::AppError;
use crate::CommunityError;

/// Header read by [`trusted_principal_header`].
pub const PRINCIPAL_HEADER: &str = "x-townhall-login";

/// Login of the authenticated caller.
///
/// The host's authentication layer inserts it as a request extension;
/// handlers extract it. A request without one is rejected with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn login(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError(CommunityError::UserNotFound))
    }
}

/// Turns the [`PRINCIPAL_HEADER`] header into a [`Principal`] extension.
///
/// Only for deployments behind a proxy that authenticates callers and sets
/// the header itself, and for local development.
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/communities", community_routes())
///     .layer(axum::middleware::from_fn(trusted_principal_header))
///     .with_state(state);
/// ```
pub async fn trusted_principal_header(mut request: Request, next: Next) -> Response {
    let login = request
        .headers()
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(ToOwned::to_owned);

    if let Some(login) = login {
        request.extensions_mut().insert(Principal(login));
    }

    next.run(request).await
}
