/// Encoding parameters handed to a `VideoWriter` before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
}

impl VideoMetadata {
    pub fn new(width: u32, height: u32, fps: f64, total_frames: usize) -> Self {
        Self {
            width,
            height,
            fps,
            total_frames,
        }
    }

    /// Playback length in seconds, 0 when the frame rate is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.fps <= 0.0 {
            0.0
        } else {
            self.total_frames as f64 / self.fps
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_construction() {
        let meta = VideoMetadata::new(512, 512, 24.0, 720);
        assert_eq!(meta.width, 512);
        assert_eq!(meta.height, 512);
        assert_eq!(meta.total_frames, 720);
    }

    #[test]
    fn test_duration_from_frames_and_fps() {
        assert_relative_eq!(VideoMetadata::new(8, 8, 24.0, 720).duration_secs(), 30.0);
        assert_relative_eq!(VideoMetadata::new(8, 8, 12.0, 360).duration_secs(), 30.0);
    }

    #[test]
    fn test_zero_fps_has_zero_duration() {
        assert_eq!(VideoMetadata::new(8, 8, 0.0, 10).duration_secs(), 0.0);
    }
}
