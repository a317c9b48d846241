use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::{PresignedRequest, PresigningConfig};
use chrono::Duration as ChronoDuration;
use larder_core::{parse_cache_bucket, ImageMetadata};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use super::{object_path, ImageStorage, PresignedUpload, StorageError};
use crate::config::S3Config;

/// Longest validity SigV4 allows for a presigned URL.
const DOWNLOAD_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// S3-compatible storage (AWS, R2, MinIO) using presigned PUT and GET.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    upload_ttl: Duration,
}

impl S3Storage {
    pub async fn from_config(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some((access_key_id, secret_access_key)) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "larder",
            ));
        }

        let shared = loader.load().await;
        // Custom endpoints (MinIO and friends) rarely support virtual-host addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            upload_ttl: config.upload_ttl,
        }
    }
}

/// Signing start for a cache bucket: the Monday that opens the bucket's week.
/// With a one-week expiry this covers every instant that maps to the bucket.
fn download_signing_start(cache_bucket: &str) -> Result<SystemTime, StorageError> {
    let bucket = parse_cache_bucket(cache_bucket)
        .ok_or_else(|| StorageError::InvalidBucket(cache_bucket.to_string()))?;
    Ok(SystemTime::from(bucket - ChronoDuration::days(6)))
}

fn signed_fields(request: &PresignedRequest) -> BTreeMap<String, String> {
    request
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[async_trait]
impl ImageStorage for S3Storage {
    async fn upload_url(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        metadata: &ImageMetadata,
    ) -> Result<PresignedUpload, StorageError> {
        let presigning = PresigningConfig::expires_in(self.upload_ttl)
            .map_err(|e| StorageError::Signing(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(object_path(owner_id, recipe_id, &metadata.key))
            .content_type(&metadata.mime_type)
            .content_length(metadata.size)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Signing(e.to_string()))?;

        Ok(PresignedUpload {
            url: request.uri().to_string(),
            method: request.method().to_string(),
            fields: signed_fields(&request),
            key: metadata.key.clone(),
        })
    }

    async fn download_url(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        key: &str,
        cache_bucket: &str,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::builder()
            .start_time(download_signing_start(cache_bucket)?)
            .expires_in(DOWNLOAD_TTL)
            .build()
            .map_err(|e| StorageError::Signing(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_path(owner_id, recipe_id, key))
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Signing(e.to_string()))?;

        Ok(request.uri().to_string())
    }

    async fn delete_object(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        key: &str,
    ) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(object_path(owner_id, recipe_id, key))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(())
    }
}
