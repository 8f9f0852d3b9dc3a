//! Filesystem image store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::instrument;
use uuid::Uuid;

use blog_core::entities::{ImageUpload, StoredImage};
use blog_core::traits::{ImageStore, RepoResult};
use blog_core::DomainError;

/// URL path under which the API serves `upload_dir`
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Writes images to `upload_dir` under random names
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    upload_dir: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl LocalImageStore {
    pub fn new(upload_dir: impl AsRef<Path>, public_base_url: &str, max_size: usize) -> Self {
        Self {
            upload_dir: upload_dir.as_ref().to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}{UPLOADS_ROUTE}/{key}", self.public_base_url)
    }

    /// Keys are generated by us; anything that could escape the directory is rejected
    fn path_for(&self, key: &str) -> RepoResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
            && !key.starts_with('.');
        if !valid {
            return Err(DomainError::ValidationError(format!(
                "Invalid image key: {key}"
            )));
        }
        Ok(self.upload_dir.join(key))
    }
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::StorageError(e.to_string())
}

#[async_trait]
impl ImageStore for LocalImageStore {
    fn max_size(&self) -> usize {
        self.max_size
    }

    #[instrument(skip(self, upload), fields(size = upload.size(), content_type = %upload.content_type))]
    async fn put(&self, upload: ImageUpload) -> RepoResult<StoredImage> {
        let (content_type, extension) = upload.validate(self.max_size)?;

        let key = format!("{}.{extension}", Uuid::new_v4().simple());
        let path = self.path_for(&key)?;

        fs::create_dir_all(&self.upload_dir).await.map_err(io_error)?;
        fs::write(&path, &upload.bytes).await.map_err(io_error)?;

        tracing::info!(key = %key, "Stored image on disk");
        Ok(StoredImage {
            url: self.url_for(&key),
            size: upload.size(),
            content_type: content_type.to_string(),
            key,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> RepoResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Image already gone");
                Ok(())
            }
            Err(e) => Err(io_error(e)),
        }
    }
}
