use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::generation::domain::capability_registry::CapabilityRegistry;
use crate::pipeline::audio_normalizer::AudioNormalizer;
use crate::pipeline::mux_stage::{MuxOutcome, MuxStage};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::request_workspace::RequestWorkspace;
use crate::pipeline::stage::{StageContext, StageKind, StageResult};

/// Narration, duration normalisation and muxing for a rendered silent video.
///
/// Shared by the primary and the fallback path. Narration problems never
/// fail the request: the video is published silent instead.
pub struct Soundtrack {
    registry: Arc<dyn CapabilityRegistry>,
    normalizer: AudioNormalizer,
    mux: MuxStage,
}

impl Soundtrack {
    pub fn new(
        registry: Arc<dyn CapabilityRegistry>,
        normalizer: AudioNormalizer,
        mux: MuxStage,
    ) -> Self {
        Self {
            registry,
            normalizer,
            mux,
        }
    }

    pub fn finish(
        &self,
        text: &str,
        enable_audio: bool,
        silent: &Path,
        final_path: &Path,
        workspace: &RequestWorkspace,
        logger: &mut dyn PipelineLogger,
    ) -> StageResult<MuxOutcome> {
        let narration = if enable_audio {
            match self.narrate(text, workspace, logger) {
                Ok(path) => Some(path),
                Err(failure) => {
                    log::warn!("{failure}; continuing without audio");
                    None
                }
            }
        } else {
            None
        };

        let audio = narration.map(|path| {
            let normalized = self.normalizer.normalize(&path, workspace.path());
            if let Some(duration) = normalized.duration {
                logger.metric("narration_secs", duration);
            }
            normalized.path
        });

        let started = Instant::now();
        let outcome = self
            .mux
            .finalize(silent, audio.as_deref(), final_path, workspace.path())?;
        logger.timing("mux", started.elapsed().as_secs_f64() * 1000.0);
        Ok(outcome)
    }

    fn narrate(
        &self,
        text: &str,
        workspace: &RequestWorkspace,
        logger: &mut dyn PipelineLogger,
    ) -> StageResult<PathBuf> {
        let source = self.registry.narration_source().stage(StageKind::Narration)?;
        let path = workspace.file(&format!("narration.{}", source.file_extension()));

        let started = Instant::now();
        source.synthesize(text, &path).stage(StageKind::Narration)?;
        logger.timing("narration", started.elapsed().as_secs_f64() * 1000.0);
        logger.info("Narration generated");
        Ok(path)
    }
}
