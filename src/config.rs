//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sigcli/sigcli.toml`
//! 3. Explicit config file passed by the caller
//! 4. Environment variables: `SIGCLI_*` prefix
//!
//! Settings are read, never written back.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "SIGCLI";

/// Settings could not be loaded or serialized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("config error: {message}")]
pub struct SettingsError {
    pub message: String,
}

/// Presentation and grammar settings shared by every command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Names that trigger help (`help` -> `--help`, `h` -> `-h`)
    pub help_names: Vec<String>,
    /// Wrap width for help output
    pub width: usize,
    /// Leave the help flag out of the `Options:` section
    pub hide_help: bool,
    /// Colored error prefixes
    pub color: bool,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            help_names: vec!["help".into(), "h".into()],
            width: 70,
            hide_help: false,
            color: true,
            log_level: "warn".into(),
        }
    }
}

/// Get the XDG config directory for sigcli.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sigcli").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sigcli.toml"))
}

impl Settings {
    /// Load settings: defaults, global file, `file` (must exist if given),
    /// then `SIGCLI_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_layers(global.as_deref(), file, ENV_PREFIX)
    }

    /// Load without consulting the global config file.
    pub fn load_from(file: Option<&Path>, env_prefix: &str) -> Result<Self, SettingsError> {
        Self::load_layers(None, file, env_prefix)
    }

    fn load_layers(
        global: Option<&Path>,
        file: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("help_names", defaults.help_names.clone())
            .map_err(config_err)?
            .set_default("width", defaults.width as u64)
            .map_err(config_err)?
            .set_default("hide_help", defaults.hide_help)
            .map_err(config_err)?
            .set_default("color", defaults.color)
            .map_err(config_err)?
            .set_default("log_level", defaults.log_level.clone())
            .map_err(config_err)?;

        if let Some(global) = global {
            debug!(path = %global.display(), "global config");
            builder = builder.add_source(File::from(global).required(false));
        }
        if let Some(file) = file {
            debug!(path = %file.display(), "config file");
            builder = builder.add_source(File::from(file).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("help_names")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.width < 20 {
            return Err(SettingsError {
                message: format!("width must be at least 20, got {}", self.width),
            });
        }
        if let Some(bad) = self.help_names.iter().find(|n| n.is_empty() || n.contains(char::is_whitespace)) {
            return Err(SettingsError {
                message: format!("invalid help name {bad:?}"),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sigcli configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sigcli/sigcli.toml
#   File:   path given by the application
#   Env:    SIGCLI_* environment variables (SIGCLI_HELP_NAMES="help,h")

# Names that show help; one character gives -x, longer gives --name
# help_names = ["help", "h"]

# Wrap width of help output
# width = 70

# Omit the help flag from the options listing
# hide_help = false

# Colored "error:" prefixes
# color = true

# Log filter used when RUST_LOG is unset
# log_level = "warn"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_sources_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, "SIGCLI_UNIT_NONE").expect("load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).expect("parse template");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_narrow_width_when_validating_then_rejected() {
        let settings = Settings {
            width: 5,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
