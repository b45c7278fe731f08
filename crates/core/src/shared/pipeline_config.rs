use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    BASE_FRAME_COUNT, CAPTION_FONT_SIZE, FALLBACK_FPS, FRAME_HEIGHT, FRAME_WIDTH,
    GENERATION_BUDGET_SECS, MIN_FRAME_COUNT, OUTPUT_FPS, SOFT_CHECKPOINT_SECS,
    TARGET_DURATION_SECS,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for one synthesis run. Every field has a default, so a config
/// file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub width: u32,
    pub height: u32,
    pub base_frames: usize,
    pub min_frames: usize,
    pub fps: u32,
    pub fallback_fps: u32,
    /// Length of the final video, and the minimum narration length.
    pub target_duration_secs: u32,
    pub generation_budget_secs: u64,
    pub soft_checkpoint_secs: u64,
    pub caption_font_size: f32,
    pub temp_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            base_frames: BASE_FRAME_COUNT,
            min_frames: MIN_FRAME_COUNT,
            fps: OUTPUT_FPS,
            fallback_fps: FALLBACK_FPS,
            target_duration_secs: TARGET_DURATION_SECS,
            generation_budget_secs: GENERATION_BUDGET_SECS,
            soft_checkpoint_secs: SOFT_CHECKPOINT_SECS,
            caption_font_size: CAPTION_FONT_SIZE,
            temp_dir: std::env::temp_dir().join("shorts-video"),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, else the per-user config file if one exists,
    /// else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                log::info!("Using pipeline config {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.width == 0 || self.height == 0 {
            return invalid("width/height", "frame dimensions must be positive");
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return invalid("width/height", "frame dimensions must be even for yuv420p");
        }
        if self.base_frames == 0 {
            return invalid("base_frames", "at least one frame must be requested");
        }
        if self.fps == 0 || self.fallback_fps == 0 {
            return invalid("fps", "frame rates must be positive");
        }
        if self.target_duration_secs == 0 {
            return invalid("target_duration_secs", "duration must be positive");
        }
        if self.soft_checkpoint_secs > self.generation_budget_secs {
            return invalid(
                "soft_checkpoint_secs",
                "soft checkpoint must not exceed the generation budget",
            );
        }
        if self.caption_font_size.is_nan() || self.caption_font_size <= 0.0 {
            return invalid("caption_font_size", "font size must be positive");
        }
        Ok(())
    }

    /// Frames in the primary output: `duration * fps`.
    pub fn target_frame_count(&self) -> usize {
        self.target_duration_secs as usize * self.fps as usize
    }

    /// Frames in the fallback output: `duration * fallback_fps`.
    pub fn fallback_frame_count(&self) -> usize {
        self.target_duration_secs as usize * self.fallback_fps as usize
    }

    pub fn generation_budget(&self) -> Duration {
        Duration::from_secs(self.generation_budget_secs)
    }

    pub fn soft_checkpoint(&self) -> Duration {
        Duration::from_secs(self.soft_checkpoint_secs)
    }

    pub fn target_duration(&self) -> f64 {
        f64::from(self.target_duration_secs)
    }
}

const CONFIG_DIR_NAME: &str = "ShortsVideo";
const CONFIG_FILE_NAME: &str = "pipeline.json";

/// `<config dir>/ShortsVideo/pipeline.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.base_frames, 5);
        assert_eq!(config.min_frames, 5);
        assert_eq!(config.target_frame_count(), 720);
        assert_eq!(config.fallback_frame_count(), 360);
        assert_eq!(config.generation_budget(), Duration::from_secs(420));
        assert_eq!(config.soft_checkpoint(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pipeline.json");
        fs::write(&path, r#"{"fps": 12, "width": 256, "height": 256}"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.fps, 12);
        assert_eq!(config.width, 256);
        assert_eq!(config.base_frames, 5);
        assert_eq!(config.target_duration_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pipeline.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = PipelineConfig::load_or_default(Some(&tmp.path().join("absent.json")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[rstest]
    #[case::zero_width(PipelineConfig { width: 0, ..PipelineConfig::default() })]
    #[case::odd_height(PipelineConfig { height: 511, ..PipelineConfig::default() })]
    #[case::no_frames(PipelineConfig { base_frames: 0, ..PipelineConfig::default() })]
    #[case::zero_fps(PipelineConfig { fps: 0, ..PipelineConfig::default() })]
    #[case::zero_duration(PipelineConfig { target_duration_secs: 0, ..PipelineConfig::default() })]
    #[case::checkpoint_after_deadline(PipelineConfig {
        soft_checkpoint_secs: 500,
        ..PipelineConfig::default()
    })]
    fn test_invalid_configs_are_rejected(#[case] config: PipelineConfig) {
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_default_config_path_is_under_app_dir() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("ShortsVideo/pipeline.json"));
        }
    }
}
