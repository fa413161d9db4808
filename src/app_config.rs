use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ConfigError;
use crate::file_utils::CYRILLIC_SUFFIX;
use crate::pipeline::PluginStates;

// Application configuration module
// Handles loading, validating and saving the configuration file, and
// applying command line overrides to it.

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "srtsmith.json";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Per-plugin enabled flags and parameters
    #[serde(default)]
    pub plugins: PluginStates,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where and how processed files are written
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Replaces `.srt` in the output name when Cyrillization is enabled
    #[serde(default = "default_cyrillic_suffix")]
    pub suffix_when_cyrillic: String,

    /// Skip writing files the pipeline left unchanged
    #[serde(default = "default_true")]
    pub only_changed: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix_when_cyrillic: default_cyrillic_suffix(),
            only_changed: default_true(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_cyrillic_suffix() -> String {
    CYRILLIC_SUFFIX.to_string()
}

fn default_true() -> bool {
    true
}

/// A `--param plugin.key=value` override
#[derive(Debug, Clone, PartialEq)]
pub struct ParamOverride {
    pub plugin: String,
    pub key: String,
    pub value: f64,
}

impl std::str::FromStr for ParamOverride {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected <plugin>.<param>=<value>, got '{}'", s))?;
        let (plugin, key) = name
            .split_once('.')
            .ok_or_else(|| anyhow!("Expected <plugin>.<param>=<value>, got '{}'", s))?;
        let value = value
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid number in '{}'", s))?;
        Ok(Self {
            plugin: plugin.trim().to_string(),
            key: key.trim().to_string(),
            value,
        })
    }
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load a configuration file, writing the defaults there first when it
    /// does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Apply command line plugin overrides. Enables run before disables, and
    /// parameters last.
    pub fn apply_overrides(
        &mut self,
        enable: &[String],
        disable: &[String],
        params: &[ParamOverride],
    ) -> Result<(), ConfigError> {
        for plugin_id in enable {
            self.plugins.set_enabled(plugin_id, true)?;
        }
        for plugin_id in disable {
            self.plugins.set_enabled(plugin_id, false)?;
        }
        for param in params {
            self.plugins.set_param(&param.plugin, &param.key, param.value)?;
        }
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let suffix = &self.output.suffix_when_cyrillic;
        if suffix.is_empty() || !suffix.to_lowercase().ends_with(".srt") {
            return Err(anyhow!(
                "output.suffix_when_cyrillic must end with '.srt', got '{}'",
                suffix
            ));
        }
        Ok(())
    }

    /// Suffix for output names, when the Cyrillic naming applies
    pub fn cyrillic_suffix(&self) -> Option<&str> {
        self.plugins
            .is_enabled(crate::plugins::CYRILLIZATION)
            .then_some(self.output.suffix_when_cyrillic.as_str())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            plugins: PluginStates::default(),
            output: OutputConfig::default(),
        }
    }
}
