//! Settings structures for catalog-search configuration

use crate::query::{SearchLimits, DEFAULT_PAGE_SIZE};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "CATALOG_SEARCH_";

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CATALOG_SEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok());
    }

    /// Apply overrides from a lookup keyed by the unprefixed variable name
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("CONNECTION_STRING") {
            self.database.connection_string = val;
        }
        if let Some(val) = lookup("DATABASE") {
            self.database.database_name = val;
        }
        if let Some(val) = lookup("COLLECTION") {
            self.database.collection = val;
        }
        if let Some(val) = lookup("SEARCH_INDEX") {
            self.database.search_index = val;
        }
    }

    /// Check settings that cannot be defaulted
    pub fn validate(&self) -> Result<()> {
        if self.database.connection_string.trim().is_empty() {
            bail!(
                "database.connection_string is not configured (set {}CONNECTION_STRING)",
                ENV_PREFIX
            );
        }
        let timeout = self.database.request_timeout;
        if !(timeout.is_finite() && timeout > 0.0) {
            bail!("database.request_timeout must be a positive number of seconds");
        }
        if self.database.max_pool_size == 0 {
            bail!("database.max_pool_size must be positive");
        }
        if self.search.max_page_size == 0 {
            bail!("search.max_page_size must be positive");
        }
        if self.search.default_page_size == 0
            || self.search.default_page_size > self.search.max_page_size
        {
            bail!(
                "search.default_page_size must be between 1 and {}",
                self.search.max_page_size
            );
        }
        Ok(())
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Document database holding the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Driver connection string (`mongodb://` or `mongodb+srv://`)
    pub connection_string: String,
    pub database_name: String,
    /// Collection holding catalog records
    pub collection: String,
    /// Full-text search index name
    pub search_index: String,
    /// Connect and server selection timeout in seconds
    pub request_timeout: f64,
    /// Largest number of pooled connections per server
    pub max_pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            database_name: "catalog".to_string(),
            collection: "cznet".to_string(),
            search_index: "fuzzy_search".to_string(),
            request_timeout: 10.0,
            max_pool_size: 20,
        }
    }
}

/// Search request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Page size when the request omits one
    pub default_page_size: u32,
    /// Largest page size a client may ask for
    pub max_page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: SearchLimits::default().max_page_size,
        }
    }
}

impl SearchSettings {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_page_size: self.max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.collection, "cznet");
        assert_eq!(settings.database.search_index, "fuzzy_search");
        assert_eq!(settings.search.default_page_size, 30);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
database:
  connection_string: mongodb+srv://reader@catalog.example.net
  database_name: iguide
search:
  max_page_size: 50
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.database.database_name, "iguide");
        assert_eq!(settings.database.collection, "cznet");
        assert_eq!(settings.search.max_page_size, 50);
        assert_eq!(settings.search.limits().max_page_size, 50);
        assert_eq!(settings.server.port, 8080);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_merge_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("CONNECTION_STRING", "mongodb://localhost:27017"),
            ("COLLECTION", "records"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.connection_string, "mongodb://localhost:27017");
        assert_eq!(settings.database.collection, "records");
        assert_eq!(settings.database.database_name, "catalog");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut settings = Settings::default();
        settings.merge_from(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_validate() {
        assert!(Settings::default().validate().is_err());

        let mut settings = Settings::default();
        settings.database.connection_string = "mongodb://localhost".to_string();
        assert!(settings.validate().is_ok());

        settings.search.default_page_size = 500;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_timeout() {
        let mut settings = Settings::default();
        settings.database.connection_string = "mongodb://localhost".to_string();

        for timeout in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            settings.database.request_timeout = timeout;
            assert!(settings.validate().is_err(), "{timeout} should be rejected");
        }

        let yaml = r#"
database:
  connection_string: mongodb://localhost
  request_timeout: .nan
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.database.request_timeout.is_nan());
        assert!(settings.validate().is_err());
    }
}
