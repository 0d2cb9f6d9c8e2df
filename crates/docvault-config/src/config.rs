//! Configuration structures and loading.

use crate::error::ConfigResult;
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub consumption: ConsumptionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(crate::ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# docvault Configuration
# Encrypted document archive with watch-folder consumption

[consumption]
# Directory scanned for new documents. Must exist before the consumer starts.
# directory = "~/Documents/Consume"

# Scratch directory for temporary extraction artifacts.
# Defaults to the platform data directory when unset.
# scratch_directory = "~/.local/share/docvault/scratch"

# Minimum time (milliseconds) a file's modification timestamp must remain
# unchanged before it is eligible for consumption.
settle_ms = 500

# How often the watch command runs a consumption pass (seconds).
poll_interval_seconds = 10

# File name patterns never considered for consumption.
ignore_patterns = [
    "*.tmp",
    "*.part",
    ".*",
    "._*",
]

[storage]
# Root directory for encrypted document and thumbnail artifacts.
# Defaults to the platform data directory when unset.
# media_directory = "~/.local/share/docvault/media"

[security]
# Passphrase protecting stored artifacts. The DOCVAULT_PASSPHRASE
# environment variable takes precedence when set.
# passphrase = ""
"#
        .to_string()
    }
}

/// Consumption pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionConfig {
    /// Directory scanned for new documents.
    pub directory: Option<String>,

    /// Scratch directory for temporary extraction artifacts.
    pub scratch_directory: Option<String>,

    /// Settle delay before a file counts as stable, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Interval between consumption passes in watch mode, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// File name patterns never considered for consumption.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            directory: None,
            scratch_directory: None,
            settle_ms: default_settle_ms(),
            poll_interval_seconds: default_poll_interval(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl ConsumptionConfig {
    /// Watch directory with tilde expansion applied.
    pub fn directory_path(&self) -> Option<PathBuf> {
        self.directory.as_deref().map(expand)
    }

    /// Scratch directory with tilde expansion applied.
    pub fn scratch_path(&self) -> Option<PathBuf> {
        self.scratch_directory.as_deref().map(expand)
    }
}

/// Artifact storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for encrypted artifacts.
    pub media_directory: Option<String>,
}

impl StorageConfig {
    /// Media directory with tilde expansion applied.
    pub fn media_path(&self) -> Option<PathBuf> {
        self.media_directory.as_deref().map(expand)
    }
}

/// Encryption settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Passphrase protecting stored artifacts.
    pub passphrase: Option<String>,
}

impl SecurityConfig {
    /// Resolve the passphrase, preferring the environment variable.
    pub fn resolve_passphrase(&self) -> Option<String> {
        std::env::var("DOCVAULT_PASSPHRASE")
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| self.passphrase.clone())
    }
}

fn expand(s: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(s).as_ref())
}

fn default_settle_ms() -> u64 {
    500
}

fn default_poll_interval() -> u64 {
    10
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "*.tmp".to_string(),
        "*.part".to_string(),
        ".*".to_string(),
        "._*".to_string(),
    ]
}
