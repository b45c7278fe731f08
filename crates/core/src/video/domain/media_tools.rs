use std::path::Path;

/// Repeats an audio track back to back.
pub trait AudioLooper: Send + Sync {
    /// Writes `input` played `plays` times in a row to `output`.
    fn loop_audio(
        &self,
        input: &Path,
        plays: u32,
        output: &Path,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Combines a silent video with an audio track.
pub trait Muxer: Send + Sync {
    /// Writes `video` + `audio` to `output`, both clipped to `duration_secs`.
    fn mux(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
        duration_secs: f64,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
