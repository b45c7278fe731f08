use std::fmt;

use thiserror::Error;

/// Pipeline stages that can fail in a way the orchestrator reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    FrameGeneration,
    Interpolation,
    VideoEncoding,
    Narration,
    AudioNormalization,
    Muxing,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FrameGeneration => "frame generation",
            Self::Interpolation => "interpolation",
            Self::VideoEncoding => "video encoding",
            Self::Narration => "narration",
            Self::AudioNormalization => "audio normalization",
            Self::Muxing => "muxing",
        };
        f.write_str(name)
    }
}

/// Failure of one stage: which stage, and what went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} failed: {detail}")]
pub struct StageFailure {
    pub kind: StageKind,
    pub detail: String,
}

impl StageFailure {
    pub fn new(kind: StageKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

pub type StageResult<T> = Result<T, StageFailure>;

/// Tags an adapter error with the stage it happened in.
pub trait StageContext<T> {
    fn stage(self, kind: StageKind) -> StageResult<T>;
}

impl<T, E: fmt::Display> StageContext<T> for Result<T, E> {
    fn stage(self, kind: StageKind) -> StageResult<T> {
        self.map_err(|e| StageFailure::new(kind, e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("failed to prepare request workspace: {0}")]
    Workspace(#[source] std::io::Error),
    #[error("fallback generation failed: {0}")]
    Fallback(#[source] StageFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_names_stage() {
        let failure = StageFailure::new(StageKind::FrameGeneration, "frame 2: timeout");
        assert_eq!(failure.to_string(), "frame generation failed: frame 2: timeout");
    }

    #[test]
    fn test_stage_context_tags_errors() {
        let result: Result<(), Box<dyn std::error::Error>> = Err("disk full".into());
        let failure = result.stage(StageKind::VideoEncoding).unwrap_err();
        assert_eq!(failure.kind, StageKind::VideoEncoding);
        assert_eq!(failure.detail, "disk full");
    }

    #[test]
    fn test_stage_context_passes_success_through() {
        let result: Result<u8, String> = Ok(7);
        assert_eq!(result.stage(StageKind::Muxing), Ok(7));
    }
}
