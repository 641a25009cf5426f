//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsdraw/rsdraw.toml`
//! 3. Environment variables: `RSDRAW_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::errors::SceneError;

/// Unified configuration for rsdraw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Scene file used when a command is invoked without one
    pub default_scene: Option<PathBuf>,
    /// Prefix the draw command puts before each output line
    pub draw_verb: Option<String>,
    /// Force colored output on or off (unset: terminal detection)
    pub color: Option<bool>,
}

/// Get the XDG config directory for rsdraw.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsdraw").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsdraw.toml"))
}

/// Expand `~`, `$VAR`, and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into Settings for merging.
fn load_raw_settings(path: &Path) -> Result<Settings, SceneError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SceneError::Config(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| SceneError::Config(format!("parse {}: {}", path.display(), e)))
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where set.
    fn merge_with(&self, overlay: &Settings) -> Self {
        Self {
            default_scene: overlay
                .default_scene
                .clone()
                .or_else(|| self.default_scene.clone()),
            draw_verb: overlay.draw_verb.clone().or_else(|| self.draw_verb.clone()),
            color: overlay.color.or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rsdraw/rsdraw.toml`
    /// 3. Environment variables: `RSDRAW_*` prefix (explicit override)
    pub fn load() -> Result<Self, SceneError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply RSDRAW_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SceneError> {
        let builder = Config::builder().add_source(Environment::with_prefix("RSDRAW"));
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("default_scene") {
            settings.default_scene = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("draw_verb") {
            settings.draw_verb = Some(val);
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = Some(val);
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(scene) = &self.default_scene {
            let expanded = expand_env_vars(scene.to_string_lossy().as_ref());
            self.default_scene = Some(PathBuf::from(expanded));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SceneError> {
        toml::to_string_pretty(self).map_err(|e| SceneError::Config(format!("serialize config: {e}")))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsdraw configuration
#
# Location: ~/.config/rsdraw/rsdraw.toml
# Environment variables with the RSDRAW_ prefix override file values,
# e.g. RSDRAW_DRAW_VERB=draw

# Scene file used when a command is invoked without one
# default_scene = "~/scenes/default.scene"

# Prefix the draw command puts before each output line
# draw_verb = "draw"

# Force colored output on or off (unset: terminal detection)
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> SceneError {
    SceneError::Config(e.to_string())
}
