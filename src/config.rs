use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::controller::{DEFAULT_BRUSH, SessionState, clamp_brush};
use crate::error::Error;
use crate::palette;

pub const DEFAULT_PATH: &str = "air_canvas.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub tracker: TrackerConfig,
    pub stream: StreamConfig,
    pub brush: BrushConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub mirror: bool, // selfie view; the thumb rule assumes it
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Helper program + args. None = run without hand tracking.
    pub command: Option<Vec<String>>,
    pub min_confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub target_fps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub initial_size: u32,
    pub initial_color: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { index: 0, width: 640, height: 480, mirror: true }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { command: None, min_confidence: 0.5 }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { target_fps: 30 }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self { initial_size: DEFAULT_BRUSH, initial_color: "Red".to_string() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            tracker: TrackerConfig::default(),
            stream: StreamConfig::default(),
            brush: BrushConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file gives defaults; a broken one warns and gives defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Ok(Self::parse(&content).unwrap_or_else(|e| {
            warn!("Error parsing config {}: {e}. Loading defaults.", path.display());
            Self::default()
        }))
    }

    /// Missing fields fall back to their defaults.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("serialize: {e}")))?;
        fs::write(path, content).map_err(|e| Error::Config(format!("write {}: {e}", path.display())))
    }

    /// Starting session fields. An unknown initial color name falls back to the first swatch.
    pub fn initial_session(&self) -> SessionState {
        let color_index = palette::index_of(&self.brush.initial_color).unwrap_or_else(|| {
            warn!("Unknown initial color {:?}, using {}", self.brush.initial_color, palette::name(0));
            0
        });
        SessionState {
            color_index,
            brush_size: clamp_brush(self.brush.initial_size),
            ..SessionState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::parse(r#"{"camera":{"index":2},"brush":{"initial_color":"Blue"}}"#).unwrap();
        assert_eq!(cfg.camera.index, 2);
        assert_eq!(cfg.camera.width, 640);
        assert!(cfg.camera.mirror);
        assert_eq!(cfg.stream.target_fps, 30);
        assert_eq!(cfg.initial_session().color_index, 2);
    }

    #[test]
    fn initial_session_sanitizes() {
        let mut cfg = AppConfig::default();
        cfg.brush.initial_color = "Mauve".into();
        cfg.brush.initial_size = 0;
        let s = cfg.initial_session();
        assert_eq!(s.color_index, 0);
        assert_eq!(s.brush_size, 1);
        assert!(!s.pen_down);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("air_canvas_cfg_{}.json", std::process::id()));
        let mut cfg = AppConfig::default();
        cfg.tracker.command = Some(vec!["python3".into(), "hands.py".into()]);
        cfg.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let dir = std::env::temp_dir();
        let missing = dir.join("air_canvas_definitely_missing.json");
        assert_eq!(AppConfig::load(&missing).unwrap(), AppConfig::default());
        let broken = dir.join(format!("air_canvas_broken_{}.json", std::process::id()));
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&broken).unwrap(), AppConfig::default());
        let _ = fs::remove_file(&broken);
    }
}
