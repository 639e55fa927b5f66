//! Endpoint configuration

use serde::{Deserialize, Serialize};

use crate::types::EndpointId;

fn default_enabled() -> bool {
    true
}

/// One OpenAI-compatible chat completion endpoint.
///
/// Treated as an immutable value for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub id: EndpointId,
    /// Display name
    pub name: String,
    /// Credential sent as a bearer token; empty means none
    #[serde(default)]
    pub api_key: String,
    /// Environment variable consulted when `api_key` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Base address, e.g. `https://api.example.com/v1`
    pub base_url: String,
    /// Model identifier sent in the request body
    pub model: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl EndpointConfig {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: EndpointId(id),
            name: name.into(),
            api_key: String::new(),
            api_key_env: None,
            base_url: base_url.into(),
            model: model.into(),
            enabled: true,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_key_env(mut self, variable: impl Into<String>) -> Self {
        self.api_key_env = Some(variable.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Key to send, if any
    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.as_str()).filter(|key| !key.trim().is_empty())
    }

    /// Fill an empty `api_key` from `api_key_env` using `lookup`.
    ///
    /// `lookup` is normally `|name| std::env::var(name).ok()`.
    pub fn resolve_api_key_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key().is_none() {
            if let Some(variable) = self.api_key_env.as_deref() {
                match lookup(variable) {
                    Some(value) if !value.trim().is_empty() => {
                        tracing::debug!(endpoint = %self.name, "Using API key from ${}", variable);
                        self.api_key = value.trim().to_string();
                    }
                    _ => {
                        tracing::warn!(endpoint = %self.name, "${} is not set", variable);
                    }
                }
            }
        }
        self
    }

    /// Fill an empty `api_key` from the process environment
    pub fn resolve_api_key(self) -> Self {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Credential in a form safe to print
    pub fn masked_api_key(&self) -> String {
        match self.api_key() {
            Some(key) => mask_api_key(key),
            None => match &self.api_key_env {
                Some(variable) => format!("(from ${})", variable),
                None => "(not set)".to_string(),
            },
        }
    }
}

fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 8 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}{}", prefix, "*".repeat((len - 8).min(8)), suffix)
}
