/*!
 * Configuration support for the claim normalization engine
 *
 * Provides runtime configuration options for customizing batch behavior.
 */

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Global configuration for claim normalization runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsConfig {
    /// Directory where per-claimant output files are written, relative to
    /// the input directory unless absolute
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Whether to show progress bars during batch runs
    #[serde(default = "default_enable_progress_bar")]
    pub enable_progress_bar: bool,

    /// Abort the batch on the first file-scoped error instead of skipping
    /// the file and continuing
    #[serde(default)]
    pub halt_on_file_error: bool,

    /// Print a notice for every skipped file (unmatched or invalid)
    #[serde(default = "default_verbose_skips")]
    pub verbose_skips: bool,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            enable_progress_bar: default_enable_progress_bar(),
            halt_on_file_error: false,
            verbose_skips: default_verbose_skips(),
        }
    }
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from(crate::constants::OUTPUT_DIR_NAME)
}

fn default_enable_progress_bar() -> bool {
    true
}

fn default_verbose_skips() -> bool {
    true
}

impl ClaimsConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `CLAIMS_OUTPUT_DIR`: directory path
    /// - `CLAIMS_PROGRESS_BAR`: "true" or "false"
    /// - `CLAIMS_HALT_ON_FILE_ERROR`: "true" or "false"
    /// - `CLAIMS_VERBOSE_SKIPS`: "true" or "false"
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CLAIMS_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CLAIMS_PROGRESS_BAR") {
            config.enable_progress_bar = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("CLAIMS_HALT_ON_FILE_ERROR") {
            config.halt_on_file_error = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("CLAIMS_VERBOSE_SKIPS") {
            config.verbose_skips = val.to_lowercase() == "true";
        }

        config
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| crate::ClaimsError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                suggestion: Some("Check that the file is valid TOML format".to_string()),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::ClaimsError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                suggestion: None,
            })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/claimnorm/config.toml` on Unix-like systems
    /// or `%APPDATA%\claimnorm\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "claimnorm")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, environment, or defaults
    ///
    /// Priority order:
    /// 1. Default config file (if exists)
    /// 2. Environment variables
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::from_file(&config_path) {
                    return config;
                }
            }
        }

        Self::from_env()
    }

    /// Create a configuration suited to unattended batch runs
    pub fn unattended() -> Self {
        Self {
            output_dir: default_output_dir(),
            enable_progress_bar: false,
            halt_on_file_error: false,
            verbose_skips: true,
        }
    }

    /// Create a configuration that treats every file error as fatal
    pub fn strict() -> Self {
        Self {
            output_dir: default_output_dir(),
            enable_progress_bar: true,
            halt_on_file_error: true,
            verbose_skips: true,
        }
    }
}

// Global configuration support
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Option<ClaimsConfig>> = RwLock::new(None);
}

/// Set the global configuration
pub fn set_global_config(config: ClaimsConfig) {
    *GLOBAL_CONFIG.write().unwrap() = Some(config);
}

/// Get the global configuration (or default if not set)
pub fn global_config() -> ClaimsConfig {
    GLOBAL_CONFIG.read().unwrap()
        .as_ref()
        .cloned()
        .unwrap_or_else(ClaimsConfig::load)
}

/// Clear the global configuration
pub fn clear_global_config() {
    *GLOBAL_CONFIG.write().unwrap() = None;
}

/// Builder for customizing configuration
pub struct ConfigBuilder {
    config: ClaimsConfig,
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: ClaimsConfig::default(),
        }
    }

    /// Set the output directory
    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set progress bar enabled
    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.config.enable_progress_bar = enabled;
        self
    }

    /// Set whether a file-scoped error halts the batch
    pub fn halt_on_file_error(mut self, halt: bool) -> Self {
        self.config.halt_on_file_error = halt;
        self
    }

    /// Set whether skipped files are reported
    pub fn verbose_skips(mut self, verbose: bool) -> Self {
        self.config.verbose_skips = verbose;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClaimsConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClaimsConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("Output"));
        assert!(config.enable_progress_bar);
        assert!(!config.halt_on_file_error);
        assert!(config.verbose_skips);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .output_dir("Normalized")
            .progress_bar(false)
            .halt_on_file_error(true)
            .build();

        assert_eq!(config.output_dir, PathBuf::from("Normalized"));
        assert!(!config.enable_progress_bar);
        assert!(config.halt_on_file_error);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = ConfigBuilder::new().progress_bar(false).build();
        config.save(&path).unwrap();

        let loaded = ClaimsConfig::from_file(&path).unwrap();
        assert!(!loaded.enable_progress_bar);
        assert_eq!(loaded.output_dir, config.output_dir);
    }
}
