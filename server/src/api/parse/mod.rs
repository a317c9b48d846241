pub mod parse;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/parse endpoints (mounted at /api/parse)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(parse::parse_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(parse::parse_recipe),
    components(schemas(larder_core::ParsedRecipeForm, larder_core::InitialData))
)]
pub struct ApiDoc;
