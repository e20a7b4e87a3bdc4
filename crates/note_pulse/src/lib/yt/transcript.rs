use reqwest::Client;
use serde::Deserialize;

use crate::{
    keypool::ApiKey,
    yt::{TranscriptFetcher, TranscriptSegment},
};

/// Client for the hosted YouTube transcript API.
pub struct TranscriptApi {
    client: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No transcript available for this video")]
    NotFound,
}

impl TranscriptApi {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.supadata.ai/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn send_transcript_request(
        &self,
        link: &str,
        api_key: &ApiKey,
    ) -> Result<TranscriptResponse, TranscriptError> {
        let resp = self
            .client
            .get(format!("{}/youtube/transcript", self.base_url))
            .query(&[("url", link)])
            .header("x-api-key", api_key.as_str())
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TranscriptError::Api { status, message });
        }

        Ok(resp.json::<TranscriptResponse>().await?)
    }
}

impl Default for TranscriptApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    content: Vec<TranscriptSegment>,
}

impl TranscriptFetcher for TranscriptApi {
    type Error = TranscriptError;

    async fn fetch(
        &self,
        link: &str,
        api_key: &ApiKey,
    ) -> Result<Vec<TranscriptSegment>, Self::Error> {
        let response = self
            .send_transcript_request(link, api_key)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript"))?;

        // a video with no captions yields an empty list; treat it as a
        // failed attempt so the retry loop handles it uniformly
        if response.content.is_empty() {
            return Err(TranscriptError::NotFound);
        }

        Ok(response.content)
    }
}
