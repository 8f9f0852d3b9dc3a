//! Image store backed by an external HTTP image host
//!
//! Upload: `POST {upload_url}` with a multipart form carrying `file` and
//! `folder`, bearer-authenticated. The host answers with JSON containing the
//! stored object's id (`key` or `public_id`) and address (`secure_url` or `url`).
//!
//! Delete: `DELETE {upload_url}/{key}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode, Url};
use serde::Deserialize;
use tracing::instrument;

use blog_common::RemoteStorageConfig;
use blog_core::entities::{ImageUpload, StoredImage};
use blog_core::traits::{ImageStore, RepoResult};
use blog_core::DomainError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UploadReply {
    key: Option<String>,
    public_id: Option<String>,
    url: Option<String>,
    secure_url: Option<String>,
}

impl UploadReply {
    fn into_parts(self) -> Option<(String, String)> {
        let key = self.key.or(self.public_id)?;
        let url = self.secure_url.or(self.url)?;
        Some((key, url))
    }
}

fn storage_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::StorageError(e.to_string())
}

#[derive(Debug, Clone)]
pub struct RemoteImageStore {
    client: Client,
    upload_url: Url,
    api_key: String,
    folder: String,
    max_size: usize,
}

impl RemoteImageStore {
    pub fn new(config: &RemoteStorageConfig, max_size: usize) -> RepoResult<Self> {
        let upload_url = Url::parse(&config.upload_url).map_err(storage_error)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(storage_error)?;

        Ok(Self {
            client,
            upload_url,
            api_key: config.api_key.clone(),
            folder: config.folder.clone(),
            max_size,
        })
    }

    fn delete_url(&self, key: &str) -> RepoResult<Url> {
        let mut url = self.upload_url.clone();
        url.path_segments_mut()
            .map_err(|()| storage_error("upload URL cannot have path segments"))?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl ImageStore for RemoteImageStore {
    fn max_size(&self) -> usize {
        self.max_size
    }

    #[instrument(skip(self, upload), fields(size = upload.size(), content_type = %upload.content_type))]
    async fn put(&self, upload: ImageUpload) -> RepoResult<StoredImage> {
        let (content_type, extension) = upload.validate(self.max_size)?;

        let size = upload.size();
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(format!("image.{extension}"))
            .mime_str(content_type)
            .map_err(|_| DomainError::UnsupportedImageType(content_type.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("folder", self.folder.clone());

        let response = self
            .client
            .post(self.upload_url.clone())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(storage_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Image host rejected upload");
            return Err(storage_error(format!("upload failed with status {status}")));
        }

        let (key, url) = response
            .json::<UploadReply>()
            .await
            .map_err(storage_error)?
            .into_parts()
            .ok_or_else(|| storage_error("image host reply is missing key or url"))?;

        tracing::info!(key = %key, "Stored image on remote host");
        Ok(StoredImage {
            key,
            url,
            content_type: content_type.to_string(),
            size,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> RepoResult<()> {
        let response = self
            .client
            .delete(self.delete_url(key)?)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(storage_error)?;

        match response.status() {
            s if s.is_success() || s == StatusCode::NOT_FOUND => Ok(()),
            s => Err(storage_error(format!("delete failed with status {s}"))),
        }
    }
}
