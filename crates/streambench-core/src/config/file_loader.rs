//! File-based configuration loading and saving

use std::fs;
use std::path::Path;

use super::bench_config::BenchConfig;
use crate::error::{BenchError, BenchResult};

/// Serialization format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }
}

/// Load configuration from a file
///
/// Supports TOML, YAML and JSON based on file extension.
/// Returns the default config if the file doesn't exist.
pub fn load_from_file(path: &Path) -> BenchResult<BenchConfig> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(BenchConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        BenchError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let format = ConfigFormat::from_path(path);
    let parsed = match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|e| {
        BenchError::config_with_context(
            format!("Failed to parse {} config: {}", format.name(), e),
            format!(
                "Deserializing {} configuration from '{}'",
                format.name(),
                path.display()
            ),
        )
    })
}

/// Write configuration to a file in the format of its extension
pub fn save_to_file(config: &BenchConfig, path: &Path) -> BenchResult<()> {
    let content = match ConfigFormat::from_path(path) {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| BenchError::io_with_path(e.to_string(), parent.display().to_string()))?;
    }
    fs::write(path, content)
        .map_err(|e| BenchError::io_with_path(e.to_string(), path.display().to_string()))?;

    tracing::info!("Wrote configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TokenCountPolicy;
    use crate::types::EndpointId;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bench.toml");
        let config_toml = r#"
prompt = "Explain TCP slow start"
token_count = "chunk"

[logging]
level = "debug"
format = "compact"

[[endpoints]]
id = 7
name = "Local vLLM"
base_url = "http://127.0.0.1:8000/v1"
model = "qwen"
api_key = "sk-local"

[[endpoints]]
id = 8
name = "Disabled"
base_url = "http://127.0.0.1:9000/v1"
model = "other"
enabled = false
"#;
        fs::write(&config_path, config_toml).unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.prompt, "Explain TCP slow start");
        assert_eq!(config.token_count, TokenCountPolicy::Chunk);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0].id, EndpointId(7));
        assert_eq!(config.endpoints[0].api_key(), Some("sk-local"));
        assert!(!config.endpoints[1].enabled);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bench.yml");
        let yaml_content = r#"
prompt: hi
endpoints:
  - id: 1
    name: Gateway
    base_url: https://gateway.example.com/v1
    model: r1
    api_key_env: GATEWAY_KEY
"#;
        fs::write(&config_path, yaml_content).unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.prompt, "hi");
        assert_eq!(config.endpoints[0].api_key_env.as_deref(), Some("GATEWAY_KEY"));
        assert_eq!(config.token_count, TokenCountPolicy::Char);
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bench.json");
        fs::write(
            &config_path,
            r#"{"endpoints":[{"id":4,"name":"A","base_url":"http://a/v1","model":"m"}]}"#,
        )
        .unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].id, EndpointId(4));
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = load_from_file(Path::new("/nonexistent/streambench.toml")).unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "endpoints = [[").unwrap();

        let err = load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, BenchError::Config { .. }));
        assert!(err.message().starts_with("Failed to parse TOML config"));
    }

    #[test]
    fn test_save_then_load_each_format() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = BenchConfig::default();
        config.token_count = TokenCountPolicy::Chunk;
        config.endpoints[0].api_key = "sk-saved".to_string();

        for name in ["nested/out.toml", "out.yaml", "out.json"] {
            let path = temp_dir.path().join(name);
            save_to_file(&config, &path).unwrap();
            assert_eq!(load_from_file(&path).unwrap(), config, "format of {}", name);
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.conf")), ConfigFormat::Json);
    }
}
