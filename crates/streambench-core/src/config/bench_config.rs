//! Top-level benchmark configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::endpoint::EndpointConfig;
use super::logging_config::LoggingConfig;
use crate::error::{BenchError, BenchResult};
use crate::metrics::TokenCountPolicy;
use crate::types::EndpointId;

/// Prompt used when none is configured
pub const DEFAULT_PROMPT: &str = "你好！很高兴见到你，有什么我可以帮助你的吗？";

/// Everything a run needs, as read from the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub prompt: String,
    pub token_count: TokenCountPolicy,
    pub logging: LoggingConfig,
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            token_count: TokenCountPolicy::default(),
            logging: LoggingConfig::default(),
            endpoints: default_endpoints(),
        }
    }
}

fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        EndpointConfig::new(
            1,
            "阿里云-百炼",
            "https://dashscope.aliyuncs.com/compatible-mode/v1",
            "deepseek-r1",
        )
        .with_api_key_env("DASHSCOPE_API_KEY"),
        EndpointConfig::new(
            2,
            "硅基流动",
            "https://api.siliconflow.cn/v1",
            "deepseek-ai/DeepSeek-R1",
        )
        .with_api_key_env("SILICONFLOW_API_KEY"),
    ]
}

impl BenchConfig {
    /// Check the configuration for structural problems.
    ///
    /// Only endpoint identity is checked. Credentials and addresses are the
    /// endpoint's own business and surface as per-endpoint errors at run time.
    pub fn validate(&self) -> BenchResult<()> {
        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if !seen.insert(endpoint.id) {
                return Err(BenchError::config_with_context(
                    format!("Duplicate endpoint id {}", endpoint.id),
                    format!("Endpoint '{}'", endpoint.name),
                ));
            }
        }
        Ok(())
    }

    /// Id for a newly added endpoint: one past the largest existing id
    pub fn next_endpoint_id(&self) -> EndpointId {
        let max = self.endpoints.iter().map(|e| e.id.0).max().unwrap_or(0);
        EndpointId(max + 1)
    }

    /// Append an endpoint under a fresh id and return that id
    pub fn add_endpoint(&mut self, mut endpoint: EndpointConfig) -> EndpointId {
        endpoint.id = self.next_endpoint_id();
        let id = endpoint.id;
        self.endpoints.push(endpoint);
        id
    }

    pub fn endpoint(&self, id: EndpointId) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    pub fn enabled_endpoints(&self) -> impl Iterator<Item = &EndpointConfig> {
        self.endpoints.iter().filter(|e| e.enabled)
    }

    /// Keep only the given endpoints enabled.
    ///
    /// Unknown ids are rejected so a typo does not silently run nothing.
    pub fn restrict_to(&mut self, ids: &[EndpointId]) -> BenchResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        if let Some(unknown) = ids.iter().find(|id| self.endpoint(**id).is_none()) {
            return Err(BenchError::invalid_field(
                format!("No endpoint with id {}", unknown),
                "endpoint",
            ));
        }
        for endpoint in &mut self.endpoints {
            endpoint.enabled = ids.contains(&endpoint.id);
        }
        Ok(())
    }

    /// Resolve every endpoint's key from its environment variable if needed
    pub fn resolve_api_keys_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.endpoints = self
            .endpoints
            .into_iter()
            .map(|endpoint| endpoint.resolve_api_key_with(&lookup))
            .collect();
        self
    }
}
