use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::{RecipeFormView, RecipeService};
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/form",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Editable recipe fields", body = RecipeFormView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not owned by caller", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe_form(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeFormView>, ApiError> {
    recipes
        .get_form_fields(&user_id, id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::recipe_not_found)
}
