use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::RecipeService;
use crate::storage::PresignedUpload;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::{ImageUpload, RecipeDraft};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub recipe: RecipeDraft,
    /// The file the client will upload as the main image
    pub image_metadata: ImageUpload,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created; upload the image with the returned descriptor", body = PresignedUpload),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown taxonomy id", body = ErrorResponse),
        (status = 502, description = "Could not prepare the image upload", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let upload = recipes
        .add_recipe(&user_id, &request.recipe, &request.image_metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(upload)))
}
