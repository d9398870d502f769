use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::types::MessageRole;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// Answers end up in a 1024 character embed field.
// Roughly 1 token ≈ 4 characters, so 512 tokens leaves room for truncation
const MAX_TOKENS: u32 = 512;

const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenRouterClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(api_key, model, OPENROUTER_API_URL.to_string())
    }

    /// Create a client that posts to a custom chat-completions URL.
    pub fn with_endpoint(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            endpoint,
        }
    }

    /// Send `prompt` as a single user message and return the completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(
            "Sending {} character prompt to OpenRouter model {}",
            prompt.len(),
            self.model
        );

        let request = OpenRouterRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: MessageRole::User,
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::OpenRouterApi { status, message });
        }

        let api_response: OpenRouterResponse = response.json().await?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::OpenRouterResponse("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!("Received response from OpenRouter API");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenRouterClient {
        OpenRouterClient::with_endpoint(
            "sk-test".to_string(),
            "test/model".to_string(),
            format!("{}/api/v1/chat/completions", server.uri()),
        )
    }

    #[tokio::test]
    async fn sends_single_turn_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "max_tokens": 512,
                "temperature": 0.7,
                "messages": [{"role": "user", "content": "What is Rust?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "A language."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server).complete("What is Rust?").await.unwrap();
        assert_eq!(answer, "A language.");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let result = client(&server).complete("hi").await;
        match result {
            Err(BotError::OpenRouterApi { status, message }) => {
                assert_eq!(status.as_u16(), 402);
                assert!(message.contains("quota"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_response_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let result = client(&server).complete("hi").await;
        assert!(matches!(result, Err(BotError::OpenRouterResponse(_))));
    }
}
