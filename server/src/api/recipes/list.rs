use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::{RecipeService, RecipeView};
use axum::{
    extract::{Query, State},
    Json,
};
use larder_core::{RecipeQuery, ViewScope};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// `mine` (default) for the caller's recipes, `public` for everyone else's
    /// public recipes
    #[serde(default)]
    pub scope: ViewScope,
    /// Search query with optional filters. Supports:
    /// - Plain text: case-insensitive match on the recipe name
    /// - ingredient:value: some ingredient must contain value (can use multiple)
    /// - -ingredient:value: no ingredient may contain value
    /// - nationality:value: recipe must have this nationality (name or id)
    /// - -nationality:value: recipe must not have this nationality
    ///
    /// Example: "pancakes ingredient:egg -ingredient:nut nationality:french"
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeView>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes in scope, most recently updated first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(user_id): AuthUser,
    State(recipes): State<RecipeService>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let query = RecipeQuery::new(params.scope, params.q.as_deref());
    let recipes = recipes.list_recipes(&user_id, &query).await?;
    Ok(Json(ListRecipesResponse { recipes }))
}
