//! Drives the ordered provider chain for one image.
//!
//! Providers are tried one at a time, in priority order, and the first one
//! whose answer parses wins. Every failure is folded into a rolling "last
//! error" and the chain moves on; when it runs out, the fallback catalog is
//! served. [`Orchestrator::analyze`] therefore always yields a result.

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

use crate::catalog::FallbackCatalog;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, ProviderError, ValidationError};
use crate::image::ImageData;
use crate::model::{AnalysisResult, ProviderUsed, Recipe};
use crate::normalizer;
use crate::parser;
use crate::providers::{ProviderFactory, VisionProvider};

pub const DEMO_NOTICE: &str = "Using demo recipes - API unavailable";
pub const INVALID_IMAGE_NOTICE: &str = "Using demo recipes - invalid image data";

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct Orchestrator {
    providers: Vec<Box<dyn VisionProvider>>,
    catalog: Arc<FallbackCatalog>,
    call_timeout: Duration,
    request_timeout: Duration,
}

impl Orchestrator {
    /// Chain over `providers`, tried in the given order.
    pub fn new(providers: Vec<Box<dyn VisionProvider>>, catalog: Arc<FallbackCatalog>) -> Self {
        Orchestrator {
            providers,
            catalog,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-call and whole-request time limits.
    pub fn with_timeouts(mut self, call_timeout: Duration, request_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self.request_timeout = request_timeout;
        self
    }

    /// Build the chain from `provider_order`, leaving out disabled providers.
    pub fn from_config(
        config: &AnalyzerConfig,
        catalog: Arc<FallbackCatalog>,
    ) -> Result<Self, AnalyzerError> {
        let mut providers = Vec::new();

        for provider_name in &config.provider_order {
            let provider_config = config.provider(provider_name);
            if !provider_config.enabled {
                info!("Provider '{}' is disabled in configuration", provider_name);
                continue;
            }

            let provider = ProviderFactory::create(provider_name, &provider_config)?;
            info!(
                "Added '{}' to provider chain{}",
                provider_name,
                if provider.is_configured() {
                    ""
                } else {
                    " (no API key, will be skipped)"
                }
            );
            providers.push(provider);
        }

        Ok(Self::new(providers, catalog)
            .with_timeouts(config.call_timeout(), config.request_deadline()))
    }

    /// Provider display names in the order they are tried
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    pub fn catalog(&self) -> &FallbackCatalog {
        &self.catalog
    }

    /// Analyze an uploaded `data:image/...` URI within the configured
    /// request timeout.
    pub async fn analyze(&self, image_data: &str) -> AnalysisResult {
        self.analyze_until(image_data, Instant::now() + self.request_timeout)
            .await
    }

    /// Analyze with a caller-supplied deadline. Providers are not contacted
    /// once the deadline has passed.
    pub async fn analyze_until(&self, image_data: &str, deadline: Instant) -> AnalysisResult {
        let image = match ImageData::parse(image_data) {
            Ok(image) => image,
            Err(e) => {
                warn!("Rejecting image before contacting providers: {}", e);
                return self.invalid_request(&e);
            }
        };

        let mut last_error: Option<ProviderError> = None;
        let mut attempts = 0usize;

        for provider in &self.providers {
            let name = provider.provider_name();

            if !provider.is_configured() {
                info!("Skipping {}: no API key configured", name);
                continue;
            }

            let now = Instant::now();
            if now >= deadline {
                info!("Skipping {}: request deadline exceeded", name);
                if last_error.is_none() {
                    last_error = Some(ProviderError::deadline_exceeded(name));
                }
                continue;
            }

            attempts += 1;
            let budget = self.call_timeout.min(deadline - now);
            info!("Attempting {} (timeout {:?})", name, budget);

            match self.attempt(provider.as_ref(), &image, budget).await {
                Ok(recipes) => {
                    info!("{} returned {} recipes", name, recipes.len());
                    return AnalysisResult {
                        recipes,
                        provider_used: ProviderUsed::Provider(name.to_string()),
                        notice: None,
                        last_error: None,
                    };
                }
                Err(err) => {
                    warn!("{} failed ({}): {}", name, err.kind, err);
                    last_error = Some(err);
                }
            }
        }

        info!(
            "All providers failed or were skipped ({} attempted), using fallback recipes",
            attempts
        );
        self.fallback(DEMO_NOTICE, last_error.map(|e| e.to_string()))
    }

    /// Catalog answer for a request whose image never reached a provider.
    pub fn invalid_request(&self, err: &ValidationError) -> AnalysisResult {
        self.fallback(INVALID_IMAGE_NOTICE, Some(err.to_string()))
    }

    async fn attempt(
        &self,
        provider: &dyn VisionProvider,
        image: &ImageData,
        budget: Duration,
    ) -> Result<Vec<Recipe>, ProviderError> {
        let name = provider.provider_name();

        let raw = match timeout(budget, provider.analyze(image)).await {
            Ok(result) => result?,
            Err(_) => return Err(ProviderError::timed_out(name)),
        };
        debug!("Raw {} content: {}", name, raw);

        let records = parser::parse(&raw).map_err(|e| ProviderError::from_parse(name, &e))?;
        Ok(normalizer::normalize(records, &self.catalog.image_pool))
    }

    fn fallback(&self, notice: &str, last_error: Option<String>) -> AnalysisResult {
        AnalysisResult {
            recipes: self.catalog.recipes.clone(),
            provider_used: ProviderUsed::Demo,
            notice: Some(notice.to_string()),
            last_error,
        }
    }
}
