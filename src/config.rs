// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: JobDefaults,
}

/// Built-in defaults for job knobs, overridable from config.toml.
///
/// Values stay strings (except the booleans) because they are handed to
/// ffmpeg verbatim; the job file may override any of them per section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefaults {
    #[serde(default = "default_crf")]
    pub crf: String,

    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default = "default_width")]
    pub width: String,

    #[serde(default = "default_height")]
    pub height: String,

    #[serde(default = "default_fps")]
    pub fps: String,

    /// auto | nvenc | qsv | vaapi | cpu
    #[serde(default = "default_hwaccel")]
    pub hwaccel: String,

    /// 0 lets ffmpeg pick the thread count
    #[serde(default = "default_threads")]
    pub threads: String,

    #[serde(default)]
    pub twopass: bool,

    #[serde(default = "default_optimize")]
    pub optimize: String,
}

fn default_crf() -> String {
    "20".to_string()
}

fn default_preset() -> String {
    "veryfast".to_string()
}

fn default_width() -> String {
    "1920".to_string()
}

fn default_height() -> String {
    "1080".to_string()
}

fn default_fps() -> String {
    "30".to_string()
}

fn default_hwaccel() -> String {
    "auto".to_string()
}

fn default_threads() -> String {
    "0".to_string()
}

fn default_optimize() -> String {
    "balanced".to_string()
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            crf: default_crf(),
            preset: default_preset(),
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            hwaccel: default_hwaccel(),
            threads: default_threads(),
            twopass: false,
            optimize: default_optimize(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("videocut")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("videocut")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or fall back to built-in defaults if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            let config: Config = toml::from_str(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?;

            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let d = JobDefaults::default();
        assert_eq!(d.crf, "20");
        assert_eq!(d.preset, "veryfast");
        assert_eq!(d.width, "1920");
        assert_eq!(d.height, "1080");
        assert_eq!(d.fps, "30");
        assert_eq!(d.hwaccel, "auto");
        assert_eq!(d.threads, "0");
        assert_eq!(d.twopass, false);
        assert_eq!(d.optimize, "balanced");
    }

    #[test]
    fn config_serialization_round_trips() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();

        let deserialized: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.defaults.crf, config.defaults.crf);
        assert_eq!(deserialized.defaults.hwaccel, config.defaults.hwaccel);
    }

    #[test]
    fn partial_defaults_table_fills_in_the_rest() {
        let config: Config = toml::from_str("[defaults]\ncrf = \"28\"\npreset = \"slow\"\n").unwrap();
        assert_eq!(config.defaults.crf, "28");
        assert_eq!(config.defaults.preset, "slow");
        assert_eq!(config.defaults.width, "1920");
        assert_eq!(config.defaults.hwaccel, "auto");
    }
}
