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

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig) -> Self {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "ANTHROPIC_API_KEY");

        AnthropicProvider {
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
        AnthropicProvider {
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
impl VisionProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "Anthropic"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze(&self, image: &ImageData) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::new(self.provider_name(), ErrorKind::Unauthorized, None, "no API key")
        })?;

        // Messages API takes the image as a separate base64 block
        let request = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    {
                        "role": "user",
                        "content": [
                            {
                                "type": "image",
                                "source": {
                                    "type": "base64",
                                    "media_type": image.mime_type(),
                                    "data": image.base64()
                                }
                            },
                            {"type": "text", "text": RECIPE_ANALYSIS_PROMPT}
                        ]
                    }
                ]
            }));

        let body = send_request(self.provider_name(), request).await?;
        let content = completion_text(self.provider_name(), &body, "/content/0/text")?;
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_analyze_sends_base64_block() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "ant_key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""media_type":"image/webp""#.to_string()),
                Matcher::Regex(r#""data":"UklGRg==""#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": [{"type": "text", "text": "Here you go: [{\"title\": \"Pesto\"}]"}]}"#)
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "ant_key".to_string(),
            server.url(),
            DEFAULT_MODEL.to_string(),
        );
        let image = ImageData::parse("data:image/webp;base64,UklGRg==").unwrap();

        let result = provider.analyze(&image).await.unwrap();
        assert!(result.contains("Pesto"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_overloaded() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type": "error", "error": {"type": "overloaded_error"}}"#)
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "ant_key".to_string(),
            server.url(),
            DEFAULT_MODEL.to_string(),
        );
        let image = ImageData::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();

        let err = provider.analyze(&image).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unavailable);
        assert_eq!(err.status, Some(529));
    }

    #[test]
    fn test_provider_name() {
        let config = ProviderConfig {
            model: Some("claude-sonnet-4-5".to_string()),
            max_tokens: 4000,
            api_key: Some("test-key".to_string()),
            ..ProviderConfig::default()
        };

        let provider = AnthropicProvider::new(&config);
        assert_eq!(provider.provider_name(), "Anthropic");
        assert_eq!(provider.max_tokens, 4000);
        assert!(provider.is_configured());
    }
}
