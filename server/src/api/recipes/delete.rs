use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::RecipeService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not owned by caller", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    recipes.delete_recipe(&user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
