use crate::error::Result;
use async_trait::async_trait;

/// A multimodal model that answers a text prompt about one image.
#[async_trait]
pub trait VisionModel: Send + Sync {
    fn model_id(&self) -> &str;

    /// Returns the model's answer, trimmed. An empty answer is not an error.
    async fn describe_image(&self, prompt: &str, image_data_url: &str) -> Result<String>;
}
