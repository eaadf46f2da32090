//! Configuration structures and loading logic.
//!
//! The plugin reads an optional `abc_cache.toml` next to its DLL. Every
//! field has a default, and with no file at all the plugin behaves exactly
//! as with an empty one.

use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use abccache_core::ParamCache;
use abccache_core::param_cache::SPI_GETNONCLIENTMETRICS;

/// File name looked up in the plugin's directory.
pub const CONFIG_FILE: &str = "abc_cache.toml";

/// Name of the diagnostics command when none is configured.
pub const DEFAULT_COMMAND: &str = "abcdata";

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub command: CommandConfig,
    pub system_parameters: SystemParametersConfig,
    pub log: LogConfig,
}

/// Diagnostics command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub name: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMMAND.to_owned(),
        }
    }
}

impl CommandConfig {
    /// Returns the trimmed command name, or the default when blank.
    pub fn effective_name(&self) -> &str {
        match self.name.trim() {
            "" => DEFAULT_COMMAND,
            name => name,
        }
    }
}

/// Single-slot `SystemParametersInfoW` cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParametersConfig {
    /// Hook `SystemParametersInfoW` at all.
    pub enabled: bool,
    /// `SPI_*` action whose result is retained after the first call.
    pub action: u32,
}

impl Default for SystemParametersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            action: SPI_GETNONCLIENTMETRICS,
        }
    }
}

impl SystemParametersConfig {
    pub fn param_cache(&self) -> ParamCache {
        if self.enabled {
            ParamCache::new(self.action)
        } else {
            ParamCache::disabled()
        }
    }
}

/// Log verbosity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

impl LogConfig {
    /// Parsed level; unknown names fall back to `info`.
    pub fn effective_level(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::Info)
    }
}

/// Path of the config file inside `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

impl Config {
    /// Load config from `path`. Returns defaults if the file doesn't exist
    /// or can't be parsed.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("config: failed to read {}: {e}", path.display());
                }
                return Self::default();
            }
        };

        match toml::from_str(&data) {
            Ok(cfg) => {
                log::info!("config: loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("config: parse error in {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests;
