//! Core error type for streambench

use thiserror::Error;

/// Result type alias for streambench operations
pub type BenchResult<T> = Result<T, BenchError>;

/// Fallback text shown for an endpoint whose error carried no message.
pub(crate) const DEFAULT_FAILURE_TEXT: &str = "request failed";

/// Main error type for streambench
#[derive(Error, Debug, Clone)]
pub enum BenchError {
    /// Configuration file or value problems
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Rejected user input (no enabled endpoint, blank prompt, ...)
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Transport-level failures and non-success HTTP statuses
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// Error object returned by the provider inside the stream
    #[error("API error: {message}")]
    Api {
        message: String,
        endpoint: Option<String>,
    },

    /// Failure while reading the response stream
    #[error("Stream error: {message}")]
    Stream { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Generic error
    #[error("Error: {message}")]
    Other { message: String },
}

impl BenchError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "BENCH_CONFIG",
            Self::InvalidInput { .. } => "BENCH_INVALID_INPUT",
            Self::Http { .. } => "BENCH_HTTP",
            Self::Api { .. } => "BENCH_API",
            Self::Stream { .. } => "BENCH_STREAM",
            Self::Io { .. } => "BENCH_IO",
            Self::Json { .. } => "BENCH_JSON",
            Self::Other { .. } => "BENCH_OTHER",
        }
    }

    /// The bare message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::Http { message, .. }
            | Self::Api { message, .. }
            | Self::Stream { message }
            | Self::Io { message, .. }
            | Self::Json { message }
            | Self::Other { message } => message,
        }
    }

    /// Human-readable description stored in place of generated content when
    /// an endpoint fails.
    pub fn user_message(&self) -> String {
        if self.message().trim().is_empty() {
            return DEFAULT_FAILURE_TEXT.to_string();
        }
        match self {
            Self::Http {
                status_code: Some(code),
                message,
                ..
            } if !message.contains(&code.to_string()) => format!("{} ({})", message, code),
            _ => self.message().to_string(),
        }
    }

    /// Whether this error is a user-input rejection rather than an engine failure
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
