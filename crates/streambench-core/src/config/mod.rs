//! Benchmark configuration
//!
//! Endpoints, the prompt and the token counting policy are read from a
//! TOML, YAML or JSON file. The engine itself only ever sees
//! [`EndpointConfig`] values; loading and editing stay here.

pub mod bench_config;
pub mod endpoint;
pub mod file_loader;
pub mod logging_config;

pub use bench_config::{BenchConfig, DEFAULT_PROMPT};
pub use endpoint::EndpointConfig;
pub use file_loader::{ConfigFormat, load_from_file, save_to_file};
pub use logging_config::{LogFormat, LoggingConfig};

/// Config file looked up when none is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "streambench.toml";
