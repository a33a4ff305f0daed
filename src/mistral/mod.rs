pub mod chat_client;
pub mod traits;

use crate::{
    config::MistralConfig,
    error::{ExtractorError, Result},
    models::{ChatCompletionRequest, UserMessage},
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub use chat_client::ChatClient;
pub use traits::VisionModel;

#[derive(Clone)]
pub struct MistralClient {
    chat_client: ChatClient,
    model: String,
}

impl MistralClient {
    pub fn new(config: &MistralConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("rtablex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExtractorError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            chat_client: ChatClient::new(http, config.base_url.clone(), api_key),
            model: config.model.clone(),
        })
    }

    pub fn chat(&self) -> &ChatClient {
        &self.chat_client
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl VisionModel for MistralClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn describe_image(&self, prompt: &str, image_data_url: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model().to_string(),
            messages: vec![UserMessage::with_image(prompt, image_data_url)],
            temperature: None,
            max_tokens: None,
        };

        let response = self.chat().complete(&request).await?;
        Ok(response.first_text())
    }
}
