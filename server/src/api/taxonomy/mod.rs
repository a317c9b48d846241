pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/taxonomy endpoints (mounted at /api/taxonomy)
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}", get(list::list_taxonomy))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_taxonomy),
    components(schemas(
        list::TaxonomyResponse,
        crate::store::TaxonomyKind,
        crate::store::TaxonomyEntry,
    ))
)]
pub struct ApiDoc;
