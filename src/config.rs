use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Main analyzer configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerConfig {
    /// Providers to try, highest priority first
    #[serde(default = "default_provider_order")]
    pub provider_order: Vec<String>,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Per-provider call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Deadline for a whole analysis request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Optional path to a replacement fallback catalog (JSON)
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for a specific vision provider
///
/// Every field is optional so a provider listed in `provider_order` works
/// with nothing but its API key in the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is part of the chain
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier; each provider has its own default
    #[serde(default)]
    pub model: Option<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Bind address for the HTTP server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider_order: default_provider_order(),
            providers: HashMap::new(),
            timeout: default_timeout(),
            request_timeout: default_request_timeout(),
            catalog_path: None,
            server: ServerConfig::default(),
        }
    }
}

// Default value functions
fn default_provider_order() -> Vec<String> {
    vec!["openai".to_string(), "deepseek".to_string()]
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AnalyzerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_VISION__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_VISION__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Settings for `name`, or defaults when it has no section.
    pub fn provider(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Load configuration from file and environment variables
///
/// See [`AnalyzerConfig::load`] for precedence. `provider_order` may be given
/// in the environment as a comma separated list:
/// `RECIPE_VISION__PROVIDER_ORDER=anthropic,openai`
pub fn load_config() -> Result<AnalyzerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_VISION__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_VISION")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("provider_order")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AnalyzerConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider_order(), vec!["openai", "deepseek"]);
        assert_eq!(default_temperature(), 0.7);
        assert_eq!(default_max_tokens(), 2000);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_request_timeout(), 60);
        assert_eq!(default_port(), 8080);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.provider_order, vec!["openai", "deepseek"]);
        assert!(config.providers.is_empty());
        assert!(config.catalog_path.is_none());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_deadline(), Duration::from_secs(60));
    }

    #[test]
    fn test_provider_sections() {
        let config = from_toml(
            r#"
            provider_order = ["anthropic", "openai"]
            timeout = 10

            [providers.anthropic]
            model = "claude-sonnet-4-5"
            api_key = "sk-ant-test"

            [providers.openai]
            enabled = false
            max_tokens = 1000
            "#,
        );

        assert_eq!(config.provider_order, vec!["anthropic", "openai"]);
        assert_eq!(config.timeout, 10);

        let anthropic = config.provider("anthropic");
        assert!(anthropic.enabled);
        assert_eq!(anthropic.model.as_deref(), Some("claude-sonnet-4-5"));
        assert_eq!(anthropic.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(anthropic.max_tokens, 2000);

        let openai = config.provider("openai");
        assert!(!openai.enabled);
        assert_eq!(openai.max_tokens, 1000);
    }

    #[test]
    fn test_unlisted_provider_gets_defaults() {
        let config = AnalyzerConfig::default();
        let deepseek = config.provider("deepseek");
        assert!(deepseek.enabled);
        assert!(deepseek.api_key.is_none());
        assert!(deepseek.model.is_none());
    }

    #[test]
    fn test_load_config_without_file() {
        // No config.toml in the crate root, so every field falls back to its default
        let config = load_config().unwrap();
        assert!(!config.provider_order.is_empty());
        assert!(config.timeout > 0);
    }
}
