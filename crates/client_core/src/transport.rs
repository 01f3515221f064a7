use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{predict_url, FILE_FIELD};
use tracing::debug;

/// Remote collaborator that turns a spreadsheet into a result archive.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, file_name: &str, contents: Vec<u8>) -> Result<Vec<u8>>;
}

/// Posts the spreadsheet as multipart form data. No client-side timeout is
/// configured; the request waits as long as the transport allows.
pub struct HttpPredictionService {
    http: Client,
    api_url: String,
}

impl HttpPredictionService {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, file_name: &str, contents: Vec<u8>) -> Result<Vec<u8>> {
        let url = predict_url(&self.api_url);
        let mime_type = mime_guess::from_path(file_name).first_or_octet_stream();
        debug!(%url, file_name, size_bytes = contents.len(), "posting prediction request");

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str(mime_type.essence_str())
            .context("invalid mime type for upload part")?;
        let form = Form::new().part(FILE_FIELD, part);

        let bytes = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("failed to reach prediction service at {url}"))?
            .error_for_status()?
            .bytes()
            .await
            .context("failed to read prediction response body")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
