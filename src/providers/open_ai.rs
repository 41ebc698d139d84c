use crate::classifier::ErrorKind;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::image::ImageData;
use crate::providers::{
    completion_text, resolve_api_key, send_request, VisionProvider, RECIPE_ANALYSIS_PROMPT,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";

pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Self {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "OPENAI_API_KEY");

        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key: Some(api_key),
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze(&self, image: &ImageData) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::new(self.provider_name(), ErrorKind::Unauthorized, None, "no API key")
        })?;

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": [
                            {"type": "text", "text": RECIPE_ANALYSIS_PROMPT},
                            {"type": "image_url", "image_url": {"url": image.uri()}}
                        ]
                    }
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }));

        let body = send_request(self.provider_name(), request).await?;
        let content = completion_text(self.provider_name(), &body, "/choices/0/message/content")?;
        Ok(content.to_string())
    }
}
