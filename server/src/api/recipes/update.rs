use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::RecipeService;
use crate::storage::PresignedUpload;
use axum::{
    extract::{Path, State},
    Json,
};
use larder_core::{ImageChange, RecipeDraft};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    /// Full replacement of the editable fields
    pub recipe: RecipeDraft,
    /// What to do with the main image (default: keep)
    #[serde(default)]
    pub image: ImageChange,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    /// Present when the edit asked for a new upload
    pub upload: Option<PresignedUpload>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not owned by caller", body = ErrorResponse),
        (status = 502, description = "Could not prepare the image upload", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<Json<UpdateRecipeResponse>, ApiError> {
    let upload = recipes
        .edit_recipe(&user_id, id, &request.recipe, &request.image)
        .await?;
    Ok(Json(UpdateRecipeResponse { upload }))
}
