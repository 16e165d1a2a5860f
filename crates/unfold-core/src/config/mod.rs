//! Configuration management for unfold.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `unfold.toml` file
//! 3. User config `~/.config/unfold/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output file configuration.
    pub output: OutputConfig,

    /// Traversal configuration.
    pub traversal: TraversalConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./unfold.toml` (project local)
    /// 2. `~/.config/unfold/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        // Try project-local config first
        if Path::new("unfold.toml").exists() {
            return Self::from_file("unfold.toml");
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("unfold").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Use defaults (env overrides still apply)
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("UNFOLD_OUTPUT_DIR") {
            self.output.dir = dir;
        }
        if let Ok(hops) = std::env::var("UNFOLD_MAX_COLLECTION_HOPS") {
            if let Ok(n) = hops.parse() {
                self.traversal.max_collection_hops = n;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.traversal.max_collection_hops < 1 {
            return Err(ConfigError::Invalid(
                "traversal.max_collection_hops must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Output file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory output files are written to.
    pub dir: String,

    /// Suffix appended to the input stem for the graph dump.
    pub graph_suffix: String,

    /// Suffix appended to the input stem for the route list.
    pub routes_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
            graph_suffix: DEFAULT_GRAPH_SUFFIX.to_string(),
            routes_suffix: DEFAULT_ROUTES_SUFFIX.to_string(),
        }
    }
}

impl OutputConfig {
    /// Path of the graph dump for the given input file.
    pub fn graph_path(&self, input: &Path) -> PathBuf {
        self.output_path(input, &self.graph_suffix)
    }

    /// Path of the route list for the given input file.
    pub fn routes_path(&self, input: &Path) -> PathBuf {
        self.output_path(input, &self.routes_suffix)
    }

    fn output_path(&self, input: &Path, suffix: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("schema");
        PathBuf::from(&self.dir).join(format!("{stem}{suffix}"))
    }
}

/// Traversal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Collection hops a traversal may descend through before stopping.
    pub max_collection_hops: u32,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_collection_hops: DEFAULT_MAX_COLLECTION_HOPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir, DEFAULT_OUTPUT_DIR);
        assert_eq!(
            config.traversal.max_collection_hops,
            DEFAULT_MAX_COLLECTION_HOPS
        );
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[traversal]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[output]
dir = "routes-out"

[traversal]
max_collection_hops = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.dir, "routes-out");
        assert_eq!(config.traversal.max_collection_hops, 5);
        assert_eq!(config.output.graph_suffix, DEFAULT_GRAPH_SUFFIX);
    }

    #[test]
    fn test_output_paths() {
        let config = OutputConfig::default();
        assert_eq!(
            config.graph_path(Path::new("data/graph.csdl.xml")),
            PathBuf::from("output/graph.csdl_schema_graph.txt")
        );
        assert_eq!(
            config.routes_path(Path::new("schema.xml")),
            PathBuf::from("output/schema_paths.txt")
        );
    }
}
