use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::{RecipeService, RecipeView};
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not visible", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeView>, ApiError> {
    recipes
        .get_recipe(&user_id, id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::recipe_not_found)
}
