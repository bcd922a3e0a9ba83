use axum::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Response shape of the Dog CEO random-image endpoint.
#[derive(Debug, Deserialize)]
pub struct DogApiResponse {
    pub message: String,
    pub status: String,
}

/// Upstream random-image provider, behind a trait so tests can substitute a fake.
#[async_trait]
pub trait RandomImageClient: Send + Sync {
    async fn random_image_url(&self) -> Result<String, ProviderError>;
}

pub struct DogApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DogApiClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_owned(),
        }
    }
}

#[async_trait]
impl RandomImageClient for DogApiClient {
    async fn random_image_url(&self) -> Result<String, ProviderError> {
        let resp = self.http.get(&self.endpoint).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::BadStatus(resp.status()));
        }
        let body: DogApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;
        let url = image_url_from_response(body)?;
        debug!(url = %url, "fetched random image url");
        Ok(url)
    }
}

pub(crate) fn image_url_from_response(body: DogApiResponse) -> Result<String, ProviderError> {
    if body.status != "success" {
        return Err(ProviderError::MalformedPayload(format!(
            "upstream reported status {:?}",
            body.status
        )));
    }
    if body.message.trim().is_empty() {
        return Err(ProviderError::MalformedPayload("empty image url".into()));
    }
    Ok(body.message)
}
