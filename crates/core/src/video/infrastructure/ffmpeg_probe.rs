use std::path::Path;

use crate::video::domain::media_probe::MediaProbe;

/// Reads container-level stream information with the ffmpeg demuxer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegProbe;

impl FfmpegProbe {
    pub fn new() -> Self {
        Self
    }
}

impl MediaProbe for FfmpegProbe {
    fn duration_secs(&self, path: &Path) -> Result<f64, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        let ictx = ffmpeg_next::format::input(&path)?;

        let container = ictx.duration();
        if container > 0 {
            return Ok(container as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE));
        }

        // Some raw streams only carry per-stream durations.
        let longest = ictx
            .streams()
            .filter(|s| s.duration() > 0)
            .map(|s| s.duration() as f64 * f64::from(s.time_base()))
            .fold(0.0_f64, f64::max);
        if longest > 0.0 {
            Ok(longest)
        } else {
            Err(format!("could not determine duration of {}", path.display()).into())
        }
    }
}
