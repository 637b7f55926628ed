use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shinobi::store::{self, Store, StoreError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_width")]
    pub min_width: i32,
    #[serde(default = "default_height")]
    pub min_height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            min_width: default_width(),
            min_height: default_height(),
        }
    }
}

fn default_width() -> i32 {
    1200
}

fn default_height() -> i32 {
    800
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub batch_mode_on_start: bool,
    #[serde(default)]
    pub window: WindowConfig,
}

impl WindowConfig {
    /// Smallest size the window may take. Never larger than the default size.
    pub fn size_request(&self) -> (i32, i32) {
        (
            self.min_width.min(self.width),
            self.min_height.min(self.height),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            batch_mode_on_start: true,
            window: WindowConfig::default(),
        }
    }
}

impl Config {
    pub fn open_store(&self) -> Result<Store, StoreError> {
        match &self.data_dir {
            Some(dir) => Store::open(dir.clone()),
            None => Store::open(store::default_data_dir()?),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "shinobi", "dojo").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("DOJO").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(p) => log::info!("Wrote default config to {}", p.display()),
            Err(e) => log::warn!("Could not write default config: {}", e),
        }
    }

    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        assert_eq!(parse(DEFAULT_CONFIG), Config::default());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let cfg = parse("[window]\nwidth = 900\n");
        assert_eq!(cfg.window.width, 900);
        assert_eq!(cfg.window.height, 800);
        assert!(cfg.batch_mode_on_start);
        assert_eq!(cfg.data_dir, None);
    }

    #[test]
    fn test_window_minimum_size() {
        assert_eq!(Config::default().window.size_request(), (1200, 800));

        let cfg = parse("[window]\nmin_width = 640\nmin_height = 480\n");
        assert_eq!(cfg.window.size_request(), (640, 480));

        // a smaller default size lowers the minimum with it
        let cfg = parse("[window]\nwidth = 900\nheight = 600\n");
        assert_eq!(cfg.window.size_request(), (900, 600));
    }

    #[test]
    fn test_data_dir_override() {
        let cfg = parse("data_dir = \"/tmp/dojo\"\nbatch_mode_on_start = false\n");
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/dojo")));
        assert!(!cfg.batch_mode_on_start);
    }
}
