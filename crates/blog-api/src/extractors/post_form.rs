//! Post body extractor
//!
//! Posts are created and edited either with `multipart/form-data` (fields
//! `content`, `image`, `image_url`, `remove_image`) or with a JSON body.
//! Both forms end up as a [`PostInput`].

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
};
use blog_common::AppError;
use blog_core::ImageUpload;
use blog_service::{ImageInput, PostInput};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::validated::ValidatedJson;
use crate::response::ApiError;

/// Multipart or JSON post body; `T` is the JSON request type
#[derive(Debug)]
pub struct PostForm<T> {
    input: PostInput,
    _json: PhantomData<fn() -> T>,
}

impl<T> PostForm<T> {
    pub fn into_inner(self) -> PostInput {
        self.input
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for PostForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Into<PostInput>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let input = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            read_multipart(multipart).await?
        } else {
            let ValidatedJson(body) = ValidatedJson::<T>::from_request(req, state).await?;
            body.into()
        };

        Ok(Self {
            input,
            _json: PhantomData,
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostInput, ApiError> {
    let mut input = PostInput::default();
    let mut image_url = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "content" => {
                input.content = Some(field.text().await.map_err(multipart_error)?);
            }
            "image" => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was picked
                if bytes.is_empty() && filename.is_none() {
                    continue;
                }
                input.image = Some(ImageInput::Upload(ImageUpload::new(
                    filename,
                    content_type,
                    bytes.to_vec(),
                )));
            }
            "image_url" => {
                let url = field.text().await.map_err(multipart_error)?;
                let url = url.trim();
                if !url.is_empty() {
                    image_url = Some(url.to_string());
                }
            }
            "remove_image" => {
                let value = field.text().await.map_err(multipart_error)?;
                input.remove_image = parse_flag(&value)?;
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    if let Some(url) = image_url {
        if input.image.is_some() {
            return Err(ApiError::invalid_body(
                "Provide either an image file or image_url, not both",
            ));
        }
        input.image = Some(ImageInput::Url(url));
    }

    Ok(input)
}

fn parse_flag(value: &str) -> Result<bool, ApiError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(ApiError::invalid_body(format!(
            "Invalid remove_image value: {other}"
        ))),
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::App(AppError::PayloadTooLarge(err.body_text()))
    } else {
        ApiError::invalid_body(err.body_text())
    }
}
