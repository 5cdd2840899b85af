//! Catalog of quick-pick brands offered as one-click mission seeds.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mission::BrandSearchConfig;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPick {
    /// Display name, may mix scripts (`"DJI 大疆"`).
    pub name: String,
    /// Text actually sent as the brand name.
    pub query: String,
    #[serde(default)]
    pub desc: String,
}

impl QuickPick {
    #[must_use]
    pub fn to_brand_search(&self) -> BrandSearchConfig {
        BrandSearchConfig::deep_research(&self.query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPickCategory {
    pub id: String,
    pub label: String,
    pub brands: Vec<QuickPick>,
}

#[derive(Debug, Deserialize)]
pub struct QuickPicksFile {
    pub categories: Vec<QuickPickCategory>,
}

impl QuickPicksFile {
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&QuickPickCategory> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// Load and validate the quick-pick catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_quick_picks(path: &Path) -> Result<QuickPicksFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::QuickPicksIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: QuickPicksFile = serde_yaml::from_str(&content)?;
    validate_quick_picks(&file)?;
    Ok(file)
}

fn validate_quick_picks(file: &QuickPicksFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for category in &file.categories {
        if category.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(category.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category id: '{}'",
                category.id
            )));
        }

        let mut seen_queries = HashSet::new();
        for pick in &category.brands {
            if pick.name.trim().is_empty() || pick.query.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "quick pick in category '{}' must have a non-empty name and query",
                    category.id
                )));
            }
            if !seen_queries.insert(pick.query.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate quick pick query '{}' in category '{}'",
                    pick.query, category.id
                )));
            }
        }
    }

    Ok(())
}
