use crate::api::ErrorResponse;
use crate::db::DbPool;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::get_user_from_token;
use super::extractor::AuthUser;

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Extract the token from an `Authorization: Bearer <token>` value.
fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware that requires a valid session token and records the caller
/// for [`AuthUser`].
pub async fn require_auth(
    State(pool): State<Arc<DbPool>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request.headers().get(header::AUTHORIZATION) else {
        return unauthorized("Missing Authorization header");
    };

    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("Invalid Authorization header");
    };

    let Some(token) = bearer_token(auth_str) else {
        return unauthorized("Invalid Authorization header format");
    };

    let Some(user_id) = get_user_from_token(&pool, token).await else {
        return unauthorized("Invalid or expired token");
    };

    request.extensions_mut().insert(AuthUser(user_id));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("abc123"), None);
    }
}
