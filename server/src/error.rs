use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use larder_core::{DraftError, ImageValidationError, ParseError};
use thiserror::Error;

use crate::api::ErrorResponse;
use crate::storage::StorageError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn recipe_not_found() -> Self {
        ApiError::NotFound("Recipe not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::recipe_not_found(),
            StoreError::UnknownTaxonomy { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Pool(_) => {
                tracing::error!(error = %err, "Database unavailable");
                ApiError::Internal("Database connection failed".to_string())
            }
            StoreError::Query(_) | StoreError::Corrupt(_) => {
                tracing::error!(error = %err, "Store operation failed");
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ImageValidationError> for ApiError {
    fn from(err: ImageValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage request failed");
        ApiError::Upstream("Failed to prepare image upload".to_string())
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidUrl(_) => {
                ApiError::BadRequest("Unable to parse recipe: invalid URL".to_string())
            }
            _ => {
                tracing::warn!(error = %err, "Recipe parser failed");
                ApiError::Upstream("Unable to parse recipe".to_string())
            }
        }
    }
}
