// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Files are YAML or JSON, chosen by extension.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::camera::CameraConstraint;
use crate::gesture::GestureThresholds;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "ARBOOK_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Where books come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Simulated network latency of the book fetch.
    pub fetch_delay_ms: u64,
    /// Directory of `<id>.json` / `<id>.yaml` books. Built-in catalog when unset.
    pub library_dir: Option<PathBuf>,
    /// Root that page `imagePath`s are resolved against. When set, pages
    /// whose image is missing fail the fetch.
    pub assets_root: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 1500,
            library_dir: None,
            assets_root: None,
        }
    }
}

impl LoaderConfig {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Constraints tried in order until one opens.
    pub fallback: Vec<CameraConstraint>,
    /// Whether the simulated camera reports a device.
    pub simulated_available: bool,
    pub simulated_rear_camera: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fallback: CameraConstraint::default_chain(),
            simulated_available: true,
            simulated_rear_camera: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub loader: LoaderConfig,
    pub gestures: GestureThresholds,
    pub camera: CameraConfig,
    /// Delay before the single retry of a failed tracker start.
    pub init_retry_delay_ms: u64,
    /// Lines kept in the debug panel.
    pub debug_log_lines: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            loader: LoaderConfig::default(),
            gestures: GestureThresholds::default(),
            camera: CameraConfig::default(),
            init_retry_delay_ms: 1000,
            debug_log_lines: 10,
        }
    }
}

impl AppConfig {
    pub fn init_retry_delay(&self) -> Duration {
        Duration::from_millis(self.init_retry_delay_ms)
    }

    /// Load a config file, YAML or JSON by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?,
            _ => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?,
        };
        Ok(config)
    }

    /// Config from the first command-line argument, else `ARBOOK_CONFIG`,
    /// else defaults.
    pub fn from_env() -> Result<Self> {
        let path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "loader:\n  fetch_delay_ms: 0\ngestures:\n  window_capacity: 16\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.loader.fetch_delay(), Duration::ZERO);
        assert_eq!(config.loader.library_dir, None);
        assert_eq!(config.gestures.window_capacity, 16);
        assert_eq!(config.gestures.pinch_distance, 0.05);
        assert_eq!(config.camera.fallback, CameraConstraint::default_chain());
        assert_eq!(config.debug_log_lines, 10);
    }

    #[test]
    fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("arbook-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"camera": {"fallback": ["any"]}, "init_retry_delay_ms": 250}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.camera.fallback, vec![CameraConstraint::Any]);
        assert_eq!(config.init_retry_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load(Path::new("/nonexistent/arbook.yaml")).is_err());
    }
}
