//! JSON configuration.
//!
//! Every section is `#[serde(default)]`, so a partial file only overrides what it names.
//! The file is looked up at `$GLTOUR_CONFIG`, then `<config dir>/gltour/config.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::Action;
use crate::stage::Stage;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "GLTOUR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stage: Stage,
    pub window: WindowSettings,
    pub camera: CameraSettings,
    /// Key or mouse button name for each action, as understood by the windowing layer.
    pub bindings: BTreeMap<Action, String>,
    /// Image used by the textured stages. Falls back to a generated checkerboard.
    pub texture: Option<PathBuf>,
    /// Directory holding `<stage>/vert.glsl` and `<stage>/frag.glsl` overrides.
    pub shader_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stage: Stage::Camera,
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            bindings: default_bindings(),
            texture: None,
            shader_dir: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "gltour".to_string(),
            width: 800,
            height: 800,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub speed: f32,
    pub sprint_multiplier: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 2.0],
            speed: 0.1,
            sprint_multiplier: 4.0,
            sensitivity: 100.0,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// The default WASD layout, using SDL key and button names.
pub fn default_bindings() -> BTreeMap<Action, String> {
    [
        (Action::MoveForward, "W"),
        (Action::MoveBackward, "S"),
        (Action::StrafeLeft, "A"),
        (Action::StrafeRight, "D"),
        (Action::Ascend, "Space"),
        (Action::Descend, "Left Ctrl"),
        (Action::Sprint, "Left Shift"),
        (Action::Look, "Mouse Left"),
    ]
    .into_iter()
    .map(|(action, key)| (action, key.to_string()))
    .collect()
}

impl Config {
    /// Parses a config from JSON text. Bindings missing from the file keep their defaults.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut config: Config = serde_json::from_str(s).map_err(|e| e.to_string())?;
        for (action, key) in default_bindings() {
            config.bindings.entry(action).or_insert(key);
        }
        Ok(config)
    }

    /// Reads the config at `path`, or returns the defaults if no file exists there.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config = Self::parse(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The config file location: `$GLTOUR_CONFIG`, else the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("gltour").join("config.json"))
    }

    /// Loads the config from [`Config::default_path`], falling back to defaults.
    pub fn locate() -> Result<Self, String> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                log::warn!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Maps `log_level` to a filter, treating unknown names as `info`.
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
