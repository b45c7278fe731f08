use std::path::Path;

/// Text-to-speech capability. Writes one audio file for the whole text.
pub trait NarrationSource: Send + Sync {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), Box<dyn std::error::Error>>;

    /// Container extension of the files this source writes, e.g. `"mp3"`.
    fn file_extension(&self) -> &'static str;
}
