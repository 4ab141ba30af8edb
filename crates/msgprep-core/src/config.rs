//! Configuration types for msgprep.
//!
//! [`Config::load`] reads `~/.config/msgprep/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::front::PreviewLimits;
use crate::prepare::{FixedId, IdSource, SequentialIds};
use crate::registry::InsertMode;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[preview]
max_items      = 10
max_properties = 10
max_entries    = 10

[registry]
mode = "overwrite"

[ids]
mode        = "sequential"
start       = 1
fixed_value = "1"

[output]
pretty = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/msgprep/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewLimits,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub ids: IdsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[registry]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub mode: InsertMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdMode {
    #[default]
    Sequential,
    Fixed,
}

/// `[ids]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdsConfig {
    #[serde(default)]
    pub mode: IdMode,
    #[serde(default = "default_start")]
    pub start: u64,
    #[serde(default = "default_fixed_value")]
    pub fixed_value: String,
}

fn default_start() -> u64 { 1 }
fn default_fixed_value() -> String { "1".to_string() }

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            mode: IdMode::default(),
            start: default_start(),
            fixed_value: default_fixed_value(),
        }
    }
}

impl IdsConfig {
    /// The id source this section describes.
    pub fn source(&self) -> ConfiguredIds {
        match self.mode {
            IdMode::Sequential => ConfiguredIds::Sequential(SequentialIds::starting_at(self.start)),
            IdMode::Fixed => ConfiguredIds::Fixed(FixedId(self.fixed_value.clone())),
        }
    }
}

/// Id source selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredIds {
    Sequential(SequentialIds),
    Fixed(FixedId),
}

impl IdSource for ConfiguredIds {
    fn next_id(&mut self) -> String {
        match self {
            ConfiguredIds::Sequential(ids) => ids.next_id(),
            ConfiguredIds::Fixed(ids) => ids.next_id(),
        }
    }
}

/// `[output]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/msgprep/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
            tracing::debug!(path = %path.display(), "wrote default config");
        }

        Self::from_path(&path)
    }

    /// Load an explicit file layered on top of the built-in defaults. The
    /// file must exist.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("msgprep")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.preview, PreviewLimits::default());
        assert_eq!(cfg.registry.mode, InsertMode::Overwrite);
        assert_eq!(cfg.ids.mode, IdMode::Sequential);
        assert!(cfg.output.pretty);
    }

    #[test]
    fn fixed_ids_repeat() {
        let ids = IdsConfig {
            mode: IdMode::Fixed,
            ..IdsConfig::default()
        };
        let mut source = ids.source();
        assert_eq!(source.next_id(), "1");
        assert_eq!(source.next_id(), "1");
    }
}
