use std::env;

/// Configuration for the storefront-pricing CLI.
///
/// Nothing here is persisted; every run starts from a fresh in-memory store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output format: "human" (default) or "json"
    pub output_format: String,

    /// Log level or filter directive (default: "warn")
    pub log_level: String,

    /// Seed the store with the launch coupons and sample products
    pub seed_default_catalog: bool,
}

impl Config {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Config {
            output_format: "human".to_string(),
            log_level: "warn".to_string(),
            seed_default_catalog: true,
        }
    }

    /// Get output format
    pub fn get_output_format(&self) -> &str {
        &self.output_format
    }

    /// Set output format ("human" or "json")
    pub fn set_output_format(&mut self, format: String) {
        self.output_format = format;
    }

    /// Get log level
    pub fn get_log_level(&self) -> &str {
        &self.log_level
    }

    /// Set log level
    pub fn set_log_level(&mut self, level: String) {
        self.log_level = level;
    }

    pub fn is_json(&self) -> bool {
        self.get_output_format() == "json"
    }

    /// Load config from environment variables
    ///
    /// Environment variables:
    /// - `STOREFRONT_PRICING_OUTPUT_FORMAT`: "human" or "json"
    /// - `STOREFRONT_PRICING_LOG_LEVEL`: log level
    /// - `STOREFRONT_PRICING_SEED`: "0"/"false" starts replays from an empty catalog
    pub fn from_env() -> Self {
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::new();

        if let Some(format) = lookup("STOREFRONT_PRICING_OUTPUT_FORMAT") {
            config.output_format = format;
        }

        if let Some(level) = lookup("STOREFRONT_PRICING_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(seed) = lookup("STOREFRONT_PRICING_SEED") {
            config.seed_default_catalog = !matches!(seed.trim(), "0" | "false" | "no");
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.output_format, "human");
        assert_eq!(config.log_level, "warn");
        assert!(config.seed_default_catalog);
        assert!(!config.is_json());
    }

    #[test]
    fn test_config_setters() {
        let mut config = Config::new();
        config.set_output_format("json".to_string());
        assert_eq!(config.get_output_format(), "json");
        assert!(config.is_json());

        config.set_log_level("debug".to_string());
        assert_eq!(config.get_log_level(), "debug");
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("STOREFRONT_PRICING_OUTPUT_FORMAT", "json"),
            ("STOREFRONT_PRICING_LOG_LEVEL", "info"),
            ("STOREFRONT_PRICING_SEED", "false"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert!(config.is_json());
        assert_eq!(config.log_level, "info");
        assert!(!config.seed_default_catalog);
    }
}
