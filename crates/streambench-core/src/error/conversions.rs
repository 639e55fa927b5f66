//! From trait implementations for BenchError conversions

use super::types::BenchError;

impl From<std::io::Error> for BenchError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for BenchError {
    fn from(error: toml::de::Error) -> Self {
        Self::config_with_context(error.to_string(), "Deserializing TOML configuration")
    }
}

impl From<toml::ser::Error> for BenchError {
    fn from(error: toml::ser::Error) -> Self {
        Self::config_with_context(error.to_string(), "Serializing TOML configuration")
    }
}

impl From<serde_yaml::Error> for BenchError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_with_context(error.to_string(), "Processing YAML configuration")
    }
}

impl From<reqwest::Error> for BenchError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}
