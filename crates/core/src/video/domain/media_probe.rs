use std::path::Path;

/// Reads stream properties of an existing media file.
pub trait MediaProbe: Send + Sync {
    /// Playback duration in seconds.
    fn duration_secs(&self, path: &Path) -> Result<f64, Box<dyn std::error::Error>>;
}
