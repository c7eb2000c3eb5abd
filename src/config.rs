//! Region/category catalog and Overpass settings.
//!
//! The catalog is plain configuration data: the reference set ships in
//! `config/catalog.toml` and is embedded as the built-in default.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

const BUILTIN_CATALOG: &str = include_str!("../config/catalog.toml");

const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid overpass endpoint {endpoint:?}: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("duplicate {kind} name {name:?}")]
    Duplicate { kind: &'static str, name: String },

    #[error("category {0:?} has no tag expressions")]
    EmptyCategory(String),

    #[error("overpass.max_attempts must be at least 1")]
    NoAttempts,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub overpass: OverpassConfig,
    pub regions: Vec<RegionConfig>,
    pub categories: Vec<CategoryConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub base_delay_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
            max_attempts: 5,
            base_delay_secs: 1,
        }
    }
}

impl OverpassConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_secs(self.base_delay_secs)
    }
}

/// A named administrative area, addressed by its Overpass area id
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    pub name: String,
    pub area_id: u64,
}

/// A named group of tag expressions (`key` or `key=value`)
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    pub name: String,
    pub tags: Vec<String>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// The reference catalog shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.overpass.endpoint).map_err(|source| ConfigError::Endpoint {
            endpoint: self.overpass.endpoint.clone(),
            source,
        })?;

        if self.overpass.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "region",
                    name: region.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "category",
                    name: category.name.clone(),
                });
            }
            if category.tags.is_empty() {
                return Err(ConfigError::EmptyCategory(category.name.clone()));
            }
        }

        Ok(())
    }

    pub fn region(&self, name: &str) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_known_region(&self, name: &str) -> bool {
        self.region(name).is_some()
    }

    pub fn is_known_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let config = Config::builtin().unwrap();
        assert_eq!(config.regions.len(), 5);
        assert_eq!(config.categories.len(), 5);
        assert_eq!(config.region("alameda").unwrap().area_id, 3600396499);
        assert_eq!(config.category("bookstores").unwrap().tags, vec!["shop=books"]);
        assert_eq!(config.overpass.max_attempts, 5);
        assert_eq!(config.overpass.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_overpass_section_optional() {
        let config = Config::from_toml(
            r#"
            [[regions]]
            name = "a"
            area_id = 1

            [[categories]]
            name = "parks"
            tags = ["leisure=park"]
            "#,
        )
        .unwrap();
        assert_eq!(config.overpass.endpoint, DEFAULT_ENDPOINT);
        assert!(config.is_known_region("a"));
        assert!(!config.is_known_region("b"));
        assert!(config.is_known_category("parks"));
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let result = Config::from_toml(
            r#"
            regions = [{ name = "a", area_id = 1 }, { name = "a", area_id = 2 }]
            categories = []
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Duplicate { kind: "region", .. })));
    }

    #[test]
    fn test_empty_category_rejected() {
        let result = Config::from_toml(
            r#"
            regions = []
            categories = [{ name = "parks", tags = [] }]
            "#,
        );
        assert!(matches!(result, Err(ConfigError::EmptyCategory(_))));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let result = Config::from_toml(
            r#"
            regions = []
            categories = []

            [overpass]
            endpoint = "not a url"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Endpoint { .. })));
    }
}
