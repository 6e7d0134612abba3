//! Settings for the scratch card and the page around it.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. No file at all is the normal case.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Looked up in the working directory when no path is passed on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "scratch-heart.json";

/// Heart outline, identical to the one in the page markup.
pub const HEART_PATH: &str =
    "M100,57 C100,0 5,0 5,57 C5,114 43,152 100,190 C157,152 195,114 195,57 C195,0 100,0 100,57 Z";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side of the square drawing surface.
    pub surface_size: u32,
    /// SVG path data for the heart, in surface units.
    pub heart_path: String,
    pub texture_path: PathBuf,
    /// Vertical offset of the texture inside the heart (negative = up).
    pub texture_offset_y: i32,
    /// Fill used while the texture is missing.
    pub fallback_fill: String,
    pub brush_radius: f32,
    pub check_interval_ms: u64,
    /// Percentage that must be *exceeded* to finish.
    pub reveal_threshold: f64,
    /// Approximate opaque pixel count of a fresh heart at this size.
    pub estimated_total: usize,
    pub music_path: Option<PathBuf>,
    pub confetti: ConfettiConfig,
    pub window_width: usize,
    pub window_height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    pub particle_count: usize,
    /// Degrees, centred on straight up.
    pub spread: f32,
    pub colors: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            surface_size: 200,
            heart_path: HEART_PATH.to_string(),
            texture_path: PathBuf::from("assets/glitter.png"),
            texture_offset_y: -13,
            fallback_fill: "#fff5f8".to_string(),
            brush_radius: 20.0,
            check_interval_ms: 200,
            reveal_threshold: 80.0,
            estimated_total: 18_000,
            music_path: Some(PathBuf::from("assets/music.mp3")),
            confetti: ConfettiConfig::default(),
            window_width: 360,
            window_height: 420,
        }
    }
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            spread: 70.0,
            colors: ["#a53860", "#ffafcc", "#3a7ca5", "#ffffff"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load `path` (or the default file). A missing default file means
    /// defaults; anything unreadable is logged and also falls back.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !explicit && !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using built-in defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_constants() {
        let config = Config::default();
        assert_eq!(config.surface_size, 200);
        assert_eq!(config.brush_radius, 20.0);
        assert_eq!(config.check_interval(), Duration::from_millis(200));
        assert_eq!(config.reveal_threshold, 80.0);
        assert_eq!(config.estimated_total, 18_000);
        assert_eq!(config.confetti.particle_count, 150);
        assert_eq!(config.confetti.colors.len(), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "brush_radius": 12.5, "confetti": { "spread": 90 } }"#)
            .unwrap();
        assert_eq!(config.brush_radius, 12.5);
        assert_eq!(config.confetti.spread, 90.0);
        assert_eq!(config.confetti.particle_count, 150);
        assert_eq!(config.estimated_total, 18_000);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = std::env::temp_dir().join(format!("scratch-heart-config-{}-bad_file", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::from_file(&path), Err(Error::ConfigParse { .. })));
        assert_eq!(Config::load(Some(path.as_path())).surface_size, 200);

        let missing = dir.join("missing.json");
        assert!(matches!(Config::from_file(&missing), Err(Error::ConfigRead { .. })));
    }
}
