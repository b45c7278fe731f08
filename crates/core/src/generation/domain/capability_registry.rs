use std::sync::Arc;

use crate::generation::domain::frame_source::FrameSource;
use crate::generation::domain::narration_source::NarrationSource;

/// Hands out the expensive generation capabilities.
///
/// Implementations load each capability on first request and return the
/// same handle afterwards, so callers may ask for it on every run.
pub trait CapabilityRegistry: Send + Sync {
    fn frame_source(&self) -> Result<Arc<dyn FrameSource>, Box<dyn std::error::Error>>;
    fn narration_source(&self) -> Result<Arc<dyn NarrationSource>, Box<dyn std::error::Error>>;
}
