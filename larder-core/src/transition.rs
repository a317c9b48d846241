//! Planning for recipe image edits.
//!
//! An edit moves a recipe's image between the three [`MainImage`] states. The
//! plan says what to persist, which storage object became garbage, and whether
//! the client needs an upload URL. Executing it is up to the caller.

use serde::{Deserialize, Serialize};

use crate::error::ImageValidationError;
use crate::image::{validate_image_url, ImageMetadata, ImageUpload, MainImage};

/// What an edit asks to do with the recipe's image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageChange {
    /// Leave the current image untouched.
    #[default]
    Keep,
    /// Drop the image entirely.
    Remove,
    /// Point at an externally hosted image.
    Url { url: String },
    /// Replace the image with a new upload.
    Upload { metadata: ImageUpload },
}

impl ImageChange {
    pub fn validate(&self) -> Result<(), ImageValidationError> {
        match self {
            ImageChange::Keep | ImageChange::Remove => Ok(()),
            ImageChange::Url { url } => validate_image_url(url),
            ImageChange::Upload { metadata } => metadata.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    /// Image to persist for the recipe.
    pub next: MainImage,
    /// Storage object that is no longer referenced once `next` is persisted.
    pub stale_key: Option<String>,
    /// Metadata to request a signed upload URL for.
    pub upload: Option<ImageMetadata>,
}

/// Plan the transition from `current` for `change`.
///
/// `fresh_key` is the storage key for a new upload. Callers generate it once
/// per edit and must reuse it for every step of the transition. Returns `None`
/// for [`ImageChange::Keep`].
pub fn plan_transition(
    current: &MainImage,
    change: &ImageChange,
    fresh_key: &str,
) -> Option<ImagePlan> {
    let old_key = current.storage_key().map(str::to_string);

    let plan = match change {
        ImageChange::Keep => return None,
        ImageChange::Remove => ImagePlan {
            next: MainImage::None,
            stale_key: old_key,
            upload: None,
        },
        ImageChange::Url { url } => ImagePlan {
            next: MainImage::External { url: url.clone() },
            stale_key: old_key,
            upload: None,
        },
        ImageChange::Upload { metadata } => {
            let metadata = metadata.with_key(fresh_key);
            ImagePlan {
                next: MainImage::Stored(metadata.clone()),
                stale_key: old_key.filter(|key| key != fresh_key),
                upload: Some(metadata),
            }
        }
    };

    Some(plan)
}

/// Short label for logs.
pub fn state_name(image: &MainImage) -> &'static str {
    match image {
        MainImage::None => "none",
        MainImage::External { .. } => "url",
        MainImage::Stored(_) => "presignedUrl",
    }
}
