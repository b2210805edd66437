use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use facecrop_vision::{CropOptions, DetectorSettings, DEFAULT_CLASSIFIER};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| match option_env!("FACECROP_CONFIG_PATH") {
    Some(path) => PathBuf::from(path),
    None => ProjectDirs::from("", "", "facecrop")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("facecrop.toml")),
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: PathBuf,
    pub name: String,
    pub mime_type: String,
    pub quality: f32,
    pub factor: f64,
    pub min_face_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        let options = CropOptions::default();
        Self {
            classifier: PathBuf::from(DEFAULT_CLASSIFIER),
            name: options.name,
            mime_type: options.mime_type,
            quality: options.quality,
            factor: options.factor,
            min_face_size: 0,
        }
    }
}

impl Config {
    pub fn crop_options(&self) -> CropOptions {
        CropOptions {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            quality: self.quality,
            factor: self.factor,
        }
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings {
            min_face_size: self.min_face_size,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
