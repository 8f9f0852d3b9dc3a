//! # blog-storage
//!
//! [`ImageStore`] implementations for post images:
//!
//! - [`LocalImageStore`] writes files under an upload directory that the API
//!   serves at `/uploads`
//! - [`RemoteImageStore`] hands files to an external image host over HTTP

mod local;
mod remote;

use std::sync::Arc;

use blog_common::{StorageConfig, StorageProvider};
use blog_core::traits::ImageStore;
use blog_core::DomainError;

pub use local::{LocalImageStore, UPLOADS_ROUTE};
pub use remote::RemoteImageStore;

/// Build the image store selected by `config.provider`
pub fn create_image_store(config: &StorageConfig) -> Result<Arc<dyn ImageStore>, DomainError> {
    let max_size = config.max_file_size_bytes();

    match config.provider {
        StorageProvider::Local => Ok(Arc::new(LocalImageStore::new(
            &config.upload_dir,
            &config.public_base_url,
            max_size,
        ))),
        StorageProvider::Remote => {
            let remote = config.remote.as_ref().ok_or_else(|| {
                DomainError::StorageError("remote storage is not configured".to_string())
            })?;
            Ok(Arc::new(RemoteImageStore::new(remote, max_size)?))
        }
    }
}
