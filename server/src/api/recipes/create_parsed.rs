use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::RecipeService;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::{RecipeDraft, SiteInfo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateParsedRecipeRequest {
    pub recipe: RecipeDraft,
    pub site_info: SiteInfo,
    /// Image found on the source page, kept as an external link
    pub url_source_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateParsedRecipeResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/recipes/parsed",
    tag = "recipes",
    request_body = CreateParsedRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = CreateParsedRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown taxonomy id", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_parsed_recipe(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Json(request): Json<CreateParsedRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = recipes
        .add_parsed_recipe(
            &user_id,
            &request.recipe,
            &request.site_info,
            request.url_source_image.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(CreateParsedRecipeResponse { id })))
}
