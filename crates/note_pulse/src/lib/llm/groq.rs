use reqwest::Client;
use serde::Deserialize;

use crate::{
    keypool::ApiKey,
    llm::{
        normalizer::{normalize_notes, FormatError},
        NoteSection, NotesSynthesizer,
    },
};

/// Chat-completion client for Groq's OpenAI-compatible API.
///
/// The key is supplied per request so one client instance can serve every
/// key in the pool.
pub struct GroqClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GroqError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in completion response")]
    NoContent,
    #[error("Malformed notes: {0}")]
    Format(#[from] FormatError),
}

impl GroqClient {
    const SYSTEM_PROMPT: &str = include_str!("./prompts/notes_system.txt");

    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.groq.com/openai/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_completion_request(
        &self,
        api_key: &ApiKey,
        model_name: impl Into<String>,
        user_content: impl Into<String>,
    ) -> Result<CompletionResponse, GroqError> {
        let body = serde_json::json!({
            "model": model_name.into(),
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.as_str())
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GroqError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

impl Default for GroqClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl NotesSynthesizer for GroqClient {
    const NOTES_MODEL: &'static str = "llama-3.3-70b-versatile";

    type Error = GroqError;

    async fn synthesize(
        &self,
        api_key: &ApiKey,
        transcript_text: &str,
    ) -> Result<Vec<NoteSection>, Self::Error> {
        let user_prompt = format!(
            "Please structure the following transcript into notes adhering \
             to the above guidelines:\n\n{transcript_text}"
        );

        let response = self
            .send_completion_request(api_key, Self::NOTES_MODEL, user_prompt)
            .await?;

        let raw = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(GroqError::NoContent)?;

        let notes = normalize_notes(raw)
            .inspect_err(|e| tracing::warn!(error = ?e, "Completion was not valid notes JSON"))?;

        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[tokio::test]
    async fn synthesize_parses_strict_json_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "[{\"heading\":\"Greeting\",\"content\":\"Hello world\"}]",
            )))
            .mount(&server)
            .await;

        let client = GroqClient::new().with_base_url(server.uri());
        let key = ApiKey::from("test-key");

        let notes = client
            .synthesize(&key, "Hello\nworld")
            .await
            .expect("synthesize should succeed");

        assert_eq!(
            notes,
            vec![NoteSection {
                heading: "Greeting".to_string(),
                content: "Hello world".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn synthesize_recovers_json_wrapped_in_prose() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "Sure, here are your notes:\n[{\"heading\":\"H\",\"content\":\"C\"}]\nAnything else?",
            )))
            .mount(&server)
            .await;

        let client = GroqClient::new().with_base_url(server.uri());
        let key = ApiKey::from("test-key");

        let notes = client.synthesize(&key, "transcript").await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].heading, "H");
    }

    #[tokio::test]
    async fn unparsable_completion_is_a_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("I could not produce notes, sorry.")),
            )
            .mount(&server)
            .await;

        let client = GroqClient::new().with_base_url(server.uri());
        let key = ApiKey::from("test-key");

        let result = client.synthesize(&key, "transcript").await;
        assert!(matches!(result, Err(GroqError::Format(_))));
    }

    #[tokio::test]
    async fn missing_content_is_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [ { "message": { "role": "assistant", "content": null } } ]
            })))
            .mount(&server)
            .await;

        let client = GroqClient::new().with_base_url(server.uri());
        let key = ApiKey::from("test-key");

        let result = client.synthesize(&key, "transcript").await;
        assert!(matches!(result, Err(GroqError::NoContent)));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = GroqClient::new().with_base_url(server.uri());
        let key = ApiKey::from("test-key");

        match client.synthesize(&key, "transcript").await {
            Err(GroqError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }
}
