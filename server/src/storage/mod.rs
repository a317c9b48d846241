//! Object storage for uploaded recipe images.
//!
//! Image bytes never pass through this server. Clients receive a signed
//! upload URL and write to the bucket directly; reads get a signed download
//! URL. Objects live under `{owner}/{recipe}/{key}`.

#[cfg(test)]
pub mod fake;
mod s3;

pub use s3::S3Storage;

use async_trait::async_trait;
use larder_core::ImageMetadata;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Invalid cache bucket: {0}")]
    InvalidBucket(String),
}

/// Everything a client needs to upload one object straight to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PresignedUpload {
    pub url: String,
    pub method: String,
    /// Headers that were signed and must accompany the upload.
    pub fields: BTreeMap<String, String>,
    /// Storage key the upload is bound to.
    pub key: String,
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Sign an upload for `metadata.key`, bound to its declared size and type.
    async fn upload_url(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        metadata: &ImageMetadata,
    ) -> Result<PresignedUpload, StorageError>;

    /// Sign a download URL. Equal `cache_bucket` values yield equal URLs.
    async fn download_url(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        key: &str,
        cache_bucket: &str,
    ) -> Result<String, StorageError>;

    async fn delete_object(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        key: &str,
    ) -> Result<(), StorageError>;
}

pub fn object_path(owner_id: &str, recipe_id: Uuid, key: &str) -> String {
    format!("{}/{}/{}", owner_id, recipe_id, key)
}
