use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{ClientError, ensure_success};

/// Uploads images to the hosting CDN and hands back the hosted URL.
#[derive(Clone)]
pub struct ImageClient {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl ImageClient {
    pub fn new(
        upload_url: impl Into<String>,
        upload_preset: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            upload_url: upload_url.into(),
            upload_preset,
        })
    }

    /// Multipart `POST` of a single file. The hosted URL is taken from
    /// `secure_url`, falling back to `url`.
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let mut form = Form::new().part("file", part);
        if let Some(preset) = &self.upload_preset {
            form = form.text("upload_preset", preset.clone());
        }

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = ensure_success(response).await?.json().await?;

        body.secure_url
            .or(body.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::Unexpected("upload response has no URL".to_string()))
    }
}
