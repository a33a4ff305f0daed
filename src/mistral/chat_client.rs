use crate::{
    error::{ExtractorError, Result},
    models::{ChatCompletionRequest, ChatCompletionResponse},
};
use reqwest::{header, Client};

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        log::debug!(
            "Sending chat completion to {} with model {}",
            self.endpoint(),
            request.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Mistral request failed: {}", e);
                ExtractorError::RequestError(format!("Mistral request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Mistral returned {}: {}", status, body);
            return Err(ExtractorError::ApiError {
                status: status.as_u16(),
                message: upstream_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExtractorError::ResponseError(e.to_string()))?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            ExtractorError::ResponseError(format!("unexpected chat completion payload: {}", e))
        })?;

        if let Some(usage) = &completion.usage {
            log::debug!(
                "Mistral usage: prompt {} / completion {} tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

/// Pulls the human readable message out of an error body, falling back to the raw text.
fn upstream_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("detail"))
                .or_else(|| json.pointer("/error/message"))
                .map(|m| match m.as_str() {
                    Some(s) => s.to_string(),
                    None => m.to_string(),
                })
        });
    Some(message.unwrap_or_else(|| body.to_string()))
}
