pub mod create;
pub mod create_parsed;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/parsed", post(create_parsed::create_parsed_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/form", get(form::get_recipe_form))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        create_parsed::create_parsed_recipe,
        list::list_recipes,
        get::get_recipe,
        form::get_recipe_form,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create_parsed::CreateParsedRecipeRequest,
        create_parsed::CreateParsedRecipeResponse,
        list::ListRecipesResponse,
        update::UpdateRecipeRequest,
        update::UpdateRecipeResponse,
        crate::recipes::RecipeView,
        crate::recipes::RecipeFormView,
        crate::recipes::FormImage,
        crate::storage::PresignedUpload,
        crate::store::TaxonomyEntry,
        larder_core::RecipeDraft,
        larder_core::ListItem,
        larder_core::SiteInfo,
        larder_core::ImageUpload,
        larder_core::ImageMetadata,
        larder_core::ImageChange,
        larder_core::DisplayImage,
        larder_core::DisplayImageType,
        larder_core::ViewScope,
    ))
)]
pub struct ApiDoc;
