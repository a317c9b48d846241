use crate::error::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated caller, as an opaque user id.
///
/// Populated by [`super::require_auth`]; routes outside that layer reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
