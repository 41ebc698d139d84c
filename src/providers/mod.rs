mod anthropic;
mod deepseek;
mod factory;
mod google;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use deepseek::DeepSeekProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::RECIPE_ANALYSIS_PROMPT;

use async_trait::async_trait;
use log::debug;
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::error::ProviderError;
use crate::image::ImageData;

/// Unified trait for all vision providers
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Display name reported as `apiUsed` (e.g., "OpenAI", "DeepSeek")
    fn provider_name(&self) -> &str;

    /// Whether a credential is available. Unconfigured providers are skipped.
    fn is_configured(&self) -> bool;

    /// Send the recipe prompt and image, returning the completion text.
    async fn analyze(&self, image: &ImageData) -> Result<String, ProviderError>;
}

/// Look up a credential: config value first, then the provider's env var.
pub(crate) fn resolve_api_key(configured: Option<&String>, env_var: &str) -> Option<String> {
    let present = |key: &String| !key.trim().is_empty();
    configured
        .filter(|key| present(*key))
        .cloned()
        .or_else(|| std::env::var(env_var).ok())
        .filter(present)
}

/// Send a provider request and return the decoded JSON body.
///
/// Transport errors, non-2xx answers and undecodable bodies all come back as
/// a classified [`ProviderError`].
pub(crate) async fn send_request(
    provider: &str,
    request: RequestBuilder,
) -> Result<Value, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::transport(provider, &e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::transport(provider, &e))?;
    debug!("{} responded {}: {}", provider, status, body);

    if !status.is_success() {
        return Err(ProviderError::from_response(provider, status.as_u16(), body));
    }

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::invalid_response(
            provider,
            Some(status.as_u16()),
            format!("response body is not JSON: {}", e),
        )
    })
}

/// Pull the completion text out of a decoded response.
pub(crate) fn completion_text<'a>(
    provider: &str,
    body: &'a Value,
    pointer: &str,
) -> Result<&'a str, ProviderError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ProviderError::invalid_response(
                provider,
                Some(200),
                format!("missing completion text at {}", pointer),
            )
        })
}
