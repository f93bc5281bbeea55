//! Viewer tunables
//!
//! Every constant the geometry, grid, navigation and gesture layers depend on
//! lives in `ViewerConfig`. The struct is serialized to JSON so a user can
//! override individual values; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// All tunables of the viewer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    // ========== Navigation ==========

    /// Neighbouring files kept warm around the active one
    pub preload_count: usize,

    /// Capacity of the recent-files list
    pub recent_capacity: usize,

    /// Page size requested from the drive when listing a folder
    pub page_size: usize,

    // ========== Viewer ==========

    /// Consecutive over-scroll wheel events that turn the page
    pub wheel_count: u32,

    /// Multiplicative zoom step for wheel zoom (0.4 = 40% per notch)
    pub zoom_step: f64,

    /// Horizontal swipe distance (px) that triggers navigation
    pub swipe_threshold: f64,

    /// Tolerance (px) when checking whether a swipe starts at the scroll edge
    pub swipe_edge_tolerance: f64,

    /// Slideshow auto-advance interval in milliseconds
    pub slideshow_interval_ms: u64,

    /// Overlap (px) kept between two consecutive slideshow scroll steps
    pub slideshow_overlap: f64,

    /// Delay before a container resize is applied to the layout
    pub resize_debounce_ms: u64,

    /// Minimum time between two image-error triggered listing refetches
    pub image_error_cooldown_secs: i64,

    // ========== Thumbnail grid ==========

    /// Height of one thumbnail cell in px
    pub thumbnail_height: f64,

    /// Width of one thumbnail cell in px; `None` lets `columns` decide
    pub thumbnail_width: Option<f64>,

    /// Fixed column count; `None` derives it from the container width
    pub columns: Option<usize>,

    /// Vertical gap between rows in px
    pub row_gap: f64,

    /// Horizontal gap between columns in px
    pub column_gap: f64,

    /// Width reserved for the grid's own scrollbar
    pub grid_scrollbar_width: f64,

    /// Rows materialized above and below the viewport
    pub rows_ahead: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            preload_count: 3,
            recent_capacity: 10,
            page_size: 1000,
            wheel_count: 3,
            zoom_step: 0.4,
            swipe_threshold: 60.0,
            swipe_edge_tolerance: 5.0,
            slideshow_interval_ms: 5000,
            slideshow_overlap: 50.0,
            resize_debounce_ms: 150,
            image_error_cooldown_secs: 5 * 60,
            thumbnail_height: 220.0,
            thumbnail_width: None,
            columns: Some(1),
            row_gap: 4.0,
            column_gap: 4.0,
            grid_scrollbar_width: 20.0,
            rows_ahead: 1,
        }
    }
}

impl ViewerConfig {
    /// Convert to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON string; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the config at `path`, or the defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Write the config to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Default location of the config file
    /// - Linux: ~/.config/drive-photos/config.json
    /// - macOS: ~/Library/Application Support/drive-photos/config.json
    /// - Windows: %APPDATA%\drive-photos\config.json
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("drive-photos");
        path.push("config.json");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.preload_count, 3);
        assert_eq!(config.wheel_count, 3);
        assert_eq!(config.recent_capacity, 10);
        assert_eq!(config.resize_debounce_ms, 150);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{ "preload_count": 5 }"#).unwrap();
        assert_eq!(config.preload_count, 5);
        assert_eq!(config.thumbnail_height, 220.0);
        assert_eq!(config.columns, Some(1));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = ViewerConfig::default();
        config.zoom_step = 0.25;
        config.columns = None;
        config.thumbnail_width = Some(160.0);
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
