use crate::config::ProviderConfig;
use crate::error::AnalyzerError;
use crate::providers::{
    AnthropicProvider, DeepSeekProvider, GoogleProvider, OpenAIProvider, VisionProvider,
};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from its configuration name
    ///
    /// A provider without credentials is still created; the orchestrator
    /// skips it at request time.
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn VisionProvider>, AnalyzerError> {
        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config))),
            "deepseek" => Ok(Box::new(DeepSeekProvider::new(config))),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config))),
            "google" => Ok(Box::new(GoogleProvider::new(config))),
            _ => Err(AnalyzerError::UnknownProvider(provider_name.to_string())),
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "deepseek", "anthropic", "google"]
    }
}
