use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::radar::DEFAULT_SIZE;
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Name of the configuration file looked up from the working directory.
pub const CONFIG_FILE: &str = ".mvjudge.toml";

/// Top-level configuration from `.mvjudge.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub radar: RadarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".mvjudge")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

/// Settings for the remote analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_thinking_budget() -> u32 {
    24576
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            thinking_budget: default_thinking_budget(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    #[serde(default = "default_radar_size")]
    pub size: f64,
}

fn default_radar_size() -> f64 {
    DEFAULT_SIZE
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            size: default_radar_size(),
        }
    }
}

impl Config {
    /// Load configuration from a `.mvjudge.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let mut config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `mvjudge init` to create a valid config file",
                path.display()
            )
        })?;
        // A relative data_dir names the same history wherever the tool runs from.
        if config.storage.data_dir.is_relative() {
            if let Some(base) = path.parent() {
                config.storage.data_dir = base.join(&config.storage.data_dir);
            }
        }
        if config.upload.max_bytes == 0 {
            anyhow::bail!("'{}': upload.max_bytes must be positive", path.display());
        }
        if !(config.radar.size.is_finite() && config.radar.size > 0.0) {
            anyhow::bail!("'{}': radar.size must be a positive number", path.display());
        }
        Ok(config)
    }

    /// Load from `.mvjudge.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        warn!(
                            path = %config_path.display(),
                            "failed to load config: {e:#}. Using defaults."
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `mvjudge init`.
    pub fn default_toml() -> String {
        r#"# mvjudge - AIGC music video review configuration

[storage]
# Directory holding the review history (reviewHistory.json), relative to this file
data_dir = ".mvjudge"

[upload]
# Largest accepted video, in bytes (100 MB)
max_bytes = 104857600

[analyzer]
endpoint = "https://generativelanguage.googleapis.com"
model = "gemini-3-pro-preview"
# Environment variable holding the API key
api_key_env = "GEMINI_API_KEY"
timeout_secs = 600
thinking_budget = 24576

[export]
# Directory CSV exports are written to
output_dir = "."

[radar]
# Edge length of the SVG radar chart
size = 300.0
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, PathBuf::from(".mvjudge"));
        assert_eq!(config.upload.max_bytes, 100 * 1024 * 1024);
        assert_eq!(config.analyzer.model, "gemini-3-pro-preview");
        assert!((config.radar.size - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_toml_is_valid() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
        assert_eq!(config.upload.max_bytes, defaults.upload.max_bytes);
        assert_eq!(config.analyzer.endpoint, defaults.analyzer.endpoint);
        assert_eq!(config.analyzer.thinking_budget, 24576);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
[analyzer]
model = "gemini-2.5-flash"

[upload]
max_bytes = 1024
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analyzer.model, "gemini-2.5-flash");
        assert_eq!(config.analyzer.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.upload.max_bytes, 1024);
        assert_eq!(config.export.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_rejects_zero_upload_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[upload]\nmax_bytes = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[storage]\ndata_dir = \"reviews\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::load_or_default(&nested);
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.storage.data_dir, root.join("reviews"));
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[upload]\nmax_bytes = 10\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, dir.path().join(".mvjudge"));

        let absolute = dir.path().join("elsewhere");
        std::fs::write(
            &path,
            format!("[storage]\ndata_dir = {:?}\n", absolute.to_str().unwrap()),
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, absolute);
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[storage\n").unwrap();
        let config = Config::load_or_default(dir.path());
        assert_eq!(config.storage.data_dir, PathBuf::from(".mvjudge"));
    }
}
