//! In-memory storage double that records every call.

use async_trait::async_trait;
use larder_core::ImageMetadata;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::{object_path, ImageStorage, PresignedUpload, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Upload { path: String },
    Download { path: String, cache_bucket: String },
    Delete { path: String },
}

#[derive(Debug, Default)]
pub struct FakeStorage {
    calls: Mutex<Vec<StorageCall>>,
    fail_uploads: AtomicBool,
    fail_downloads: AtomicBool,
    failing_keys: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_uploads(self) -> Self {
        self.fail_uploads.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_downloads(self) -> Self {
        self.fail_downloads.store(true, Ordering::SeqCst);
        self
    }

    /// Fail downloads of `key` only.
    pub fn failing_download_for(self, key: &str) -> Self {
        self.failing_keys.lock().unwrap().push(key.to_string());
        self
    }

    pub fn failing_deletes(self) -> Self {
        self.fail_deletes.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StorageCall::Delete { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StorageCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ImageStorage for FakeStorage {
    async fn upload_url(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        metadata: &ImageMetadata,
    ) -> Result<PresignedUpload, StorageError> {
        let path = object_path(owner_id, recipe_id, &metadata.key);
        self.record(StorageCall::Upload { path: path.clone() });
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Signing("upload signing disabled".to_string()));
        }

        let mut fields = BTreeMap::new();
        fields.insert("content-type".to_string(), metadata.mime_type.clone());
        fields.insert("content-length".to_string(), metadata.size.to_string());
        Ok(PresignedUpload {
            url: format!("https://fake-storage/{}", path),
            method: "PUT".to_string(),
            fields,
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
        let path = object_path(owner_id, recipe_id, key);
        self.record(StorageCall::Download {
            path: path.clone(),
            cache_bucket: cache_bucket.to_string(),
        });
        if self.fail_downloads.load(Ordering::SeqCst)
            || self.failing_keys.lock().unwrap().iter().any(|k| k == key)
        {
            return Err(StorageError::Request("bucket unavailable".to_string()));
        }
        Ok(format!("https://fake-storage/{}?v={}", path, cache_bucket))
    }

    async fn delete_object(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        key: &str,
    ) -> Result<(), StorageError> {
        self.record(StorageCall::Delete {
            path: object_path(owner_id, recipe_id, key),
        });
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Request("delete refused".to_string()));
        }
        Ok(())
    }
}
