//! Turns stored image references into URLs a client can load.

use futures::future::join_all;
use larder_core::{DisplayImage, MainImage};
use uuid::Uuid;

use crate::storage::ImageStorage;
use crate::store::StoredRecipe;

/// Resolve one image for display. Storage failures degrade to `noImage`
/// rather than failing the read.
pub async fn resolve_display_image(
    storage: &dyn ImageStorage,
    owner_id: &str,
    recipe_id: Uuid,
    image: &MainImage,
    cache_bucket: &str,
) -> DisplayImage {
    match image {
        MainImage::None => DisplayImage::no_image(),
        MainImage::External { url } => DisplayImage::external(url.clone()),
        MainImage::Stored(metadata) => {
            match storage
                .download_url(owner_id, recipe_id, &metadata.key, cache_bucket)
                .await
            {
                Ok(url) => DisplayImage::presigned(url),
                Err(e) => {
                    tracing::warn!(
                        recipe_id = %recipe_id,
                        key = %metadata.key,
                        error = %e,
                        "Failed to sign image download, showing no image"
                    );
                    DisplayImage::no_image()
                }
            }
        }
    }
}

/// Resolve the images of many recipes concurrently, in input order.
pub async fn resolve_all(
    storage: &dyn ImageStorage,
    recipes: &[StoredRecipe],
    cache_bucket: &str,
) -> Vec<DisplayImage> {
    join_all(recipes.iter().map(|recipe| {
        resolve_display_image(
            storage,
            &recipe.author_id,
            recipe.id,
            &recipe.main_image,
            cache_bucket,
        )
    }))
    .await
}
