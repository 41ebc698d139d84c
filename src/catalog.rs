use log::info;
use serde::Deserialize;
use std::path::Path;

use crate::error::AnalyzerError;
use crate::model::Recipe;

/// Catalog shipped with the binary.
///
/// Loaded from `catalog.json` at compile time so it can be edited as plain
/// JSON; a replacement can be supplied at runtime via `catalog_path`.
pub const BUILTIN_CATALOG: &str = include_str!("catalog.json");

/// Recipes served when no provider produces a usable answer, plus the image
/// pool used to fill in provider recipes that come without a picture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackCatalog {
    pub version: u32,
    pub image_pool: Vec<String>,
    pub recipes: Vec<Recipe>,
}

impl FallbackCatalog {
    /// The catalog embedded in the binary
    pub fn builtin() -> Result<Self, AnalyzerError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, AnalyzerError> {
        let catalog: FallbackCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded fallback catalog v{} ({} recipes) from {}",
            catalog.version,
            catalog.recipes.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load from `path` if given, otherwise use the built-in catalog.
    pub fn load(path: Option<&str>) -> Result<Self, AnalyzerError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    fn validate(&self) -> Result<(), AnalyzerError> {
        if self.recipes.is_empty() {
            return Err(AnalyzerError::InvalidCatalog(
                "catalog must contain at least one recipe".to_string(),
            ));
        }
        if self.image_pool.is_empty() {
            return Err(AnalyzerError::InvalidCatalog(
                "image pool must contain at least one url".to_string(),
            ));
        }
        if let Some(index) = self.image_pool.iter().position(|url| url.trim().is_empty()) {
            return Err(AnalyzerError::InvalidCatalog(format!(
                "image pool entry {} is blank",
                index
            )));
        }

        for recipe in &self.recipes {
            let missing = if recipe.id.trim().is_empty() {
                Some("id")
            } else if recipe.title.trim().is_empty() {
                Some("title")
            } else if recipe.instructions.is_empty() {
                Some("instructions")
            } else if recipe.image_url.trim().is_empty() {
                Some("imageUrl")
            } else {
                None
            };

            if let Some(field) = missing {
                return Err(AnalyzerError::InvalidCatalog(format!(
                    "recipe '{}' is missing {}",
                    recipe.id, field
                )));
            }
        }

        Ok(())
    }
}
