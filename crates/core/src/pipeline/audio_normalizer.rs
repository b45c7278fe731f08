use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::video::domain::media_probe::MediaProbe;
use crate::video::domain::media_tools::AudioLooper;

const LOOPED_FILE_NAME: &str = "narration_looped.m4a";

/// Narration after duration normalisation.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedAudio {
    pub path: PathBuf,
    /// Measured length of the original track, if the probe succeeded.
    pub duration: Option<f64>,
    /// How many times the original plays back to back in `path`.
    pub plays: u32,
}

impl NormalizedAudio {
    fn unchanged(path: &Path, duration: Option<f64>) -> Self {
        Self {
            path: path.to_path_buf(),
            duration,
            plays: 1,
        }
    }
}

/// Stretches short narration to at least `min_duration_secs` by looping it.
///
/// Best effort: when the track cannot be measured or looped, the original
/// file is returned and the muxer works with whatever length it has.
pub struct AudioNormalizer {
    probe: Arc<dyn MediaProbe>,
    looper: Arc<dyn AudioLooper>,
    min_duration_secs: f64,
}

impl AudioNormalizer {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        looper: Arc<dyn AudioLooper>,
        min_duration_secs: f64,
    ) -> Self {
        Self {
            probe,
            looper,
            min_duration_secs,
        }
    }

    pub fn normalize(&self, narration: &Path, workdir: &Path) -> NormalizedAudio {
        let duration = match self.probe.duration_secs(narration) {
            Ok(d) => d,
            Err(e) => {
                log::warn!(
                    "Could not measure narration {}: {e}; using it as is",
                    narration.display()
                );
                return NormalizedAudio::unchanged(narration, None);
            }
        };
        if !duration.is_finite() || duration <= 0.0 {
            log::warn!("Narration reports duration {duration}s; using it as is");
            return NormalizedAudio::unchanged(narration, None);
        }
        if duration >= self.min_duration_secs {
            return NormalizedAudio::unchanged(narration, Some(duration));
        }

        let plays = loop_count(duration, self.min_duration_secs);
        let looped = workdir.join(LOOPED_FILE_NAME);
        match self.looper.loop_audio(narration, plays, &looped) {
            Ok(()) => {
                log::info!(
                    "Looped {duration:.1}s narration {plays}x to reach {:.0}s",
                    self.min_duration_secs
                );
                NormalizedAudio {
                    path: looped,
                    duration: Some(duration),
                    plays,
                }
            }
            Err(e) => {
                log::warn!("Could not loop narration: {e}; using it as is");
                NormalizedAudio::unchanged(narration, Some(duration))
            }
        }
    }
}

/// `ceil(min / duration)`, at least 1.
pub fn loop_count(duration: f64, min_duration: f64) -> u32 {
    if duration <= 0.0 {
        return 1;
    }
    ((min_duration / duration).ceil() as u32).max(1)
}
