use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A recipe in the shape clients receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image_url: String,
}

/// Where the recipes of a result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderUsed {
    /// Display name of the provider that answered, e.g. "OpenAI"
    Provider(String),
    /// Fallback catalog
    Demo,
}

impl ProviderUsed {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderUsed::Provider(name) => name,
            ProviderUsed::Demo => "Demo",
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, ProviderUsed::Demo)
    }
}

impl fmt::Display for ProviderUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProviderUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of analyzing one image. `recipes` is never empty.
///
/// Serializes straight to the HTTP response body:
/// `{ recipes, apiUsed, notice?, error? }`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub recipes: Vec<Recipe>,
    #[serde(rename = "apiUsed")]
    pub provider_used: ProviderUsed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Inbound request body for `POST /analyze-image`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageBase64", default)]
    pub image_base64: Option<String>,
}
