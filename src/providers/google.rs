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

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GoogleProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig) -> Self {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "GOOGLE_API_KEY");

        GoogleProvider {
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
        GoogleProvider {
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
impl VisionProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "Google"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze(&self, image: &ImageData) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::new(self.provider_name(), ErrorKind::Unauthorized, None, "no API key")
        })?;

        // Google Gemini API endpoint
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&json!({
                "contents": [{
                    "parts": [
                        {"text": RECIPE_ANALYSIS_PROMPT},
                        {
                            "inline_data": {
                                "mime_type": image.mime_type(),
                                "data": image.base64()
                            }
                        }
                    ]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }));

        let body = send_request(self.provider_name(), request).await?;
        let content = completion_text(
            self.provider_name(),
            &body,
            "/candidates/0/content/parts/0/text",
        )?;
        Ok(content.to_string())
    }
}
