/// Application configuration
///
/// Every field has a default, so the config file is optional and may
/// override only the values it names:
/// - Linux: ~/.config/stories/config.json
/// - macOS: ~/Library/Application Support/stories/config.json
/// - Windows: %APPDATA%\stories\config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::media::normalize::NormalizeOptions;
use crate::state::viewer::Timing;

/// 1080 x 1920, applied to a single edge (not to the pixel count)
pub const DEFAULT_MAX_EDGE: u32 = 1080 * 1920;

/// 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StoryConfig {
    /// Stories older than this are dropped when the collection is loaded
    pub retention_hours: u64,
    /// How long one story stays on screen before auto-advancing
    pub story_duration_ms: u64,
    /// Period of the progress timer
    pub tick_interval_ms: u64,
    /// Uploads larger than this are rejected before decoding
    pub max_upload_bytes: u64,
    /// Cap on the longer edge of a normalized image
    pub max_edge: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Fraction of the viewer width (from the left) that means "previous"
    pub previous_zone: f32,
    /// Minimum horizontal swipe distance that counts as navigation
    pub swipe_threshold: f32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            retention_hours: 24,
            story_duration_ms: 5000,
            tick_interval_ms: 100,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_edge: DEFAULT_MAX_EDGE,
            jpeg_quality: 80,
            previous_zone: 0.3,
            swipe_threshold: 50.0,
        }
    }
}

impl StoryConfig {
    /// Load the config from the user's config directory, falling back to
    /// defaults when the file is missing or unreadable
    pub fn load_or_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("⚙️  Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("⚠️  Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse config JSON; unknown timing combinations are repaired
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StoryConfig = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("stories");
        path.push("config.json");
        Some(path)
    }

    /// Replace values that would break the timer or the encoder
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.tick_interval_ms == 0 || self.story_duration_ms < self.tick_interval_ms {
            tracing::warn!(
                "⚠️  Invalid timing ({}ms per story, {}ms tick), using defaults",
                self.story_duration_ms,
                self.tick_interval_ms
            );
            self.story_duration_ms = defaults.story_duration_ms;
            self.tick_interval_ms = defaults.tick_interval_ms;
        }

        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.previous_zone = self.previous_zone.clamp(0.0, 1.0);
        self.max_edge = self.max_edge.max(1);

        self
    }

    pub fn retention_ms(&self) -> i64 {
        (self.retention_hours as i64).saturating_mul(60 * 60 * 1000)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn timing(&self) -> Timing {
        Timing {
            story_duration_ms: self.story_duration_ms,
            tick_interval_ms: self.tick_interval_ms,
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_upload_bytes: self.max_upload_bytes,
            max_edge: self.max_edge,
            quality: self.jpeg_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoryConfig::default();
        assert_eq!(config.retention_ms(), 86_400_000);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.max_upload_bytes, 5_242_880);
        assert_eq!(config.max_edge, 2_073_600);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = StoryConfig::from_json(r#"{ "retention_hours": 1 }"#).unwrap();
        assert_eq!(config.retention_hours, 1);
        assert_eq!(config.story_duration_ms, 5000);
        assert_eq!(config.jpeg_quality, 80);
    }

    #[test]
    fn test_zero_tick_falls_back_to_default_timing() {
        let config = StoryConfig::from_json(r#"{ "tick_interval_ms": 0 }"#).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.story_duration_ms, 5000);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(StoryConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "swipe_threshold": 80.0 }"#).unwrap();

        let config = StoryConfig::load_from(&path).unwrap();
        assert_eq!(config.swipe_threshold, 80.0);
    }
}
