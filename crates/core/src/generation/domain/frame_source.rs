use crate::generation::domain::frame_prompt::FramePrompt;
use crate::shared::frame::Frame;

/// Text-to-image capability: one prompt and seed in, one RGB frame out.
///
/// Implementations must be deterministic for a fixed prompt and seed as far
/// as the underlying model allows. Errors abort the whole frame loop.
pub trait FrameSource: Send + Sync {
    fn generate(&self, prompt: &FramePrompt) -> Result<Frame, Box<dyn std::error::Error>>;
}
