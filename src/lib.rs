//! # recipe-vision
//!
//! Suggest recipes from a photo of ingredients. The image is sent to a chain
//! of vision-capable LLM providers in priority order; the first usable answer
//! is normalized into [`Recipe`]s. When every provider is missing, failing or
//! rate limited, a built-in catalog of demo recipes is returned instead, so a
//! caller always gets at least one recipe.
//!
//! ## Quick start
//!
//! ```no_run
//! use recipe_vision::analyze_image;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = analyze_image("data:image/jpeg;base64,/9j/4AAQ...").await?;
//!     println!("{} recipes from {}", result.recipes.len(), result.provider_used);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom chains
//!
//! ```no_run
//! use recipe_vision::{FallbackCatalog, Orchestrator};
//! use recipe_vision::providers::{AnthropicProvider, OpenAIProvider, VisionProvider};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(FallbackCatalog::builtin()?);
//! let providers: Vec<Box<dyn VisionProvider>> = vec![
//!     Box::new(AnthropicProvider::new(&Default::default())),
//!     Box::new(OpenAIProvider::new(&Default::default())),
//! ];
//! let orchestrator = Orchestrator::new(providers, catalog);
//! let result = orchestrator.analyze("data:image/png;base64,iVBORw0KGgo=").await;
//! println!("{}", result.provider_used);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod image;
pub mod model;
pub mod normalizer;
pub mod orchestrator;
pub mod parser;
pub mod providers;
pub mod server;

use std::sync::Arc;

pub use catalog::FallbackCatalog;
pub use classifier::ErrorKind;
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, ParseError, ProviderError, ValidationError};
pub use image::ImageData;
pub use model::{AnalysisResult, ProviderUsed, Recipe};
pub use orchestrator::Orchestrator;

/// Analyze an image with the chain described by `config.toml` and the
/// environment.
///
/// Loads configuration and the catalog on every call; long-running callers
/// should build an [`Orchestrator`] once and reuse it.
pub async fn analyze_image(image_data: &str) -> Result<AnalysisResult, AnalyzerError> {
    let config = AnalyzerConfig::load()?;
    let orchestrator = build_orchestrator(&config)?;
    Ok(orchestrator.analyze(image_data).await)
}

/// Build an orchestrator and its catalog from loaded configuration.
pub fn build_orchestrator(config: &AnalyzerConfig) -> Result<Orchestrator, AnalyzerError> {
    let catalog = Arc::new(FallbackCatalog::load(config.catalog_path.as_deref())?);
    Orchestrator::from_config(config, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_orchestrator_reports_missing_catalog() {
        let config = AnalyzerConfig {
            catalog_path: Some("/definitely/not/a/catalog.json".to_string()),
            ..AnalyzerConfig::default()
        };
        let result = build_orchestrator(&config);
        assert!(matches!(result, Err(AnalyzerError::Io(_))));
    }

    #[test]
    fn test_build_orchestrator_reports_unknown_provider() {
        let config = AnalyzerConfig {
            provider_order: vec!["openai".to_string(), "mystery".to_string()],
            ..AnalyzerConfig::default()
        };
        let result = build_orchestrator(&config);
        assert!(matches!(result, Err(AnalyzerError::UnknownProvider(name)) if name == "mystery"));
    }
}
