use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::recipes::RecipeService;
use crate::store::{TaxonomyEntry, TaxonomyKind};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TaxonomyResponse {
    /// Entries sorted by name
    pub items: Vec<TaxonomyEntry>,
}

#[utoipa::path(
    get,
    path = "/api/taxonomy/{kind}",
    tag = "taxonomy",
    params(
        ("kind" = TaxonomyKind, Path, description = "meal-types, nationalities, cooking-methods or utensils")
    ),
    responses(
        (status = 200, description = "All entries of this kind", body = TaxonomyResponse),
        (status = 400, description = "Unknown kind", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_taxonomy(
    AuthUser(_user): AuthUser,
    State(recipes): State<RecipeService>,
    Path(kind): Path<TaxonomyKind>,
) -> Result<Json<TaxonomyResponse>, ApiError> {
    let items = recipes.list_taxonomy(kind)?;
    Ok(Json(TaxonomyResponse { items }))
}
