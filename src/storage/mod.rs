//! Object storage abstraction for published font artifacts
//! Uses Apache Arrow object_store crate

use bytes::Bytes;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, path::Path as StoragePath};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StorageProvider};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after upload
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub key: String,
    pub etag: Option<String>,
    pub size: usize,
}

/// Storage client wrapping object_store
#[derive(Clone)]
pub struct StorageClient {
    store: Arc<dyn ObjectStore>,
    pub bucket: String,
    public_base_url: Option<String>,
}

impl StorageClient {
    /// Create new storage client with any object_store backend
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            store,
            bucket,
            public_base_url,
        }
    }

    /// Create in-memory storage for testing/development
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(object_store::memory::InMemory::new()),
            bucket: "glyphbox-local".to_string(),
            public_base_url: None,
        }
    }

    /// Build the configured backend. Public read access on the S3 side is
    /// expected to come from the bucket policy.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config.provider {
            StorageProvider::Memory => Arc::new(object_store::memory::InMemory::new()),
            StorageProvider::S3 => {
                let mut builder = object_store::aws::AmazonS3Builder::from_env()
                    .with_bucket_name(&config.bucket);
                if let Some(region) = &config.region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(access_key) = &config.access_key {
                    builder = builder.with_access_key_id(access_key);
                }
                if let Some(secret_key) = &config.secret_key {
                    builder = builder.with_secret_access_key(secret_key);
                }
                Arc::new(builder.build()?)
            }
        };

        Ok(Self::new(
            store,
            config.bucket.clone(),
            config.public_base_url.clone(),
        ))
    }

    /// Upload bytes to storage with an explicit content type
    pub async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &'static str,
    ) -> Result<UploadMetadata> {
        let path = StoragePath::from(key);
        let size = data.len();

        let options = PutOptions {
            attributes: Attributes::from_iter([(Attribute::ContentType, content_type)]),
            ..Default::default()
        };

        let put_result = self.store.put_opts(&path, data.into(), options).await?;

        tracing::info!(key, size, content_type, "Uploaded to storage");

        Ok(UploadMetadata {
            key: key.to_string(),
            etag: put_result.e_tag.clone(),
            size,
        })
    }

    /// Download from storage
    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = StoragePath::from(key);

        let result = self.store.get(&path).await?;
        let bytes = result.bytes().await?;

        Ok(bytes.to_vec())
    }

    /// Check if key exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let path = StoragePath::from(key);

        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Public URL for a stored key. Without a configured base URL the
    /// bucket-scheme form is returned, which is still unique and stable.
    pub fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("s3://{}/{}", self.bucket, key),
        }
    }
}
