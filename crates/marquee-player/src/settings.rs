use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::player::ports::VolumeStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub version: u32,
    /// Last volume the user picked, 0.0–1.0.
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            volume: None,
        }
    }
}

impl SettingsConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("marquee-player").join("settings.json"))
    }

    /// Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Volume preference kept in the settings file.
pub struct JsonVolumeStore {
    path: Option<PathBuf>,
    config: SettingsConfig,
}

impl JsonVolumeStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = SettingsConfig::load_from(&path);
        Self {
            path: Some(path),
            config,
        }
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }
}

impl VolumeStore for JsonVolumeStore {
    fn load(&self) -> Option<f64> {
        self.config.volume.filter(|v| v.is_finite())
    }

    fn save(&mut self, volume: f64) -> Result<()> {
        self.config.volume = Some(volume);
        let Some(path) = &self.path else {
            anyhow::bail!("no config directory available");
        };
        self.config.save_to(path)
    }
}
