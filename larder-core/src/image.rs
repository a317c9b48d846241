//! Recipe main image model.
//!
//! A recipe has at most one main image, in exactly one of three states. The
//! relational store spreads that over a tagged `main_images` row plus either a
//! `url_images` or a `metadata_images` row; [`MainImage::from_parts`] is the
//! single place where those rows are folded back into the enum.

use serde::{Deserialize, Serialize};

use crate::error::{ImageStateError, ImageValidationError};

/// Largest upload a client may declare, in bytes.
pub const MAX_IMAGE_SIZE: i64 = 5 * 1024 * 1024;

/// Mime types accepted for stored images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Persisted tag for an externally hosted image.
pub const TAG_URL: &str = "url";
/// Persisted tag for an object-storage backed image.
pub const TAG_STORED: &str = "presignedUrl";

/// Metadata for an image held in object storage. Never carries a browsable URL;
/// one has to be minted per read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImageMetadata {
    pub key: String,
    pub name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Client-declared metadata for a file it is about to upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImageUpload {
    pub name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ImageUpload {
    pub fn validate(&self) -> Result<(), ImageValidationError> {
        if self.name.trim().is_empty() {
            return Err(ImageValidationError::EmptyName);
        }
        if self.size < 1 || self.size > MAX_IMAGE_SIZE {
            return Err(ImageValidationError::InvalidSize {
                size: self.size,
                max: MAX_IMAGE_SIZE,
            });
        }
        if !ALLOWED_IMAGE_TYPES.contains(&self.mime_type.as_str()) {
            return Err(ImageValidationError::UnsupportedType(self.mime_type.clone()));
        }
        Ok(())
    }

    /// Attach the storage key generated for this upload.
    pub fn with_key(&self, key: impl Into<String>) -> ImageMetadata {
        ImageMetadata {
            key: key.into(),
            name: self.name.clone(),
            size: self.size,
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Check that an external image url is an absolute http(s) url.
pub fn validate_image_url(raw: &str) -> Result<(), ImageValidationError> {
    let parsed =
        url::Url::parse(raw).map_err(|e| ImageValidationError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ImageValidationError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MainImage {
    #[default]
    None,
    External {
        url: String,
    },
    Stored(ImageMetadata),
}

impl MainImage {
    /// Rebuild the image from its relational pieces, checking that the tag and
    /// the populated sub-record agree.
    pub fn from_parts(
        tag: Option<&str>,
        url: Option<String>,
        metadata: Option<ImageMetadata>,
    ) -> Result<Self, ImageStateError> {
        match tag {
            None => {
                if url.is_some() || metadata.is_some() {
                    return Err(ImageStateError::Orphaned);
                }
                Ok(MainImage::None)
            }
            Some(TAG_URL) => {
                if metadata.is_some() {
                    return Err(ImageStateError::ConflictingRecord {
                        tag: TAG_URL,
                        extra: "metadata image",
                    });
                }
                let url = url.ok_or(ImageStateError::MissingRecord {
                    tag: TAG_URL,
                    missing: "url image",
                })?;
                Ok(MainImage::External { url })
            }
            Some(TAG_STORED) => {
                if url.is_some() {
                    return Err(ImageStateError::ConflictingRecord {
                        tag: TAG_STORED,
                        extra: "url image",
                    });
                }
                let metadata = metadata.ok_or(ImageStateError::MissingRecord {
                    tag: TAG_STORED,
                    missing: "metadata image",
                })?;
                Ok(MainImage::Stored(metadata))
            }
            Some(other) => Err(ImageStateError::UnknownTag(other.to_string())),
        }
    }

    /// The tag written to `main_images.image_type`, or `None` when no row exists.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            MainImage::None => None,
            MainImage::External { .. } => Some(TAG_URL),
            MainImage::Stored(_) => Some(TAG_STORED),
        }
    }

    pub fn storage_key(&self) -> Option<&str> {
        match self {
            MainImage::Stored(metadata) => Some(&metadata.key),
            _ => None,
        }
    }

    pub fn external_url(&self) -> Option<&str> {
        match self {
            MainImage::External { url } => Some(url),
            _ => None,
        }
    }

    pub fn metadata(&self) -> Option<&ImageMetadata> {
        match self {
            MainImage::Stored(metadata) => Some(metadata),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum DisplayImageType {
    Url,
    PresignedUrl,
    NoImage,
}

/// An image as shown to a client: a tag plus a URL it can load directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DisplayImage {
    #[serde(rename = "type")]
    pub kind: DisplayImageType,
    pub url: String,
}

impl DisplayImage {
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            kind: DisplayImageType::Url,
            url: url.into(),
        }
    }

    pub fn presigned(url: impl Into<String>) -> Self {
        Self {
            kind: DisplayImageType::PresignedUrl,
            url: url.into(),
        }
    }

    pub fn no_image() -> Self {
        Self {
            kind: DisplayImageType::NoImage,
            url: String::new(),
        }
    }
}
