use std::sync::Arc;
use std::time::Instant;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::request_workspace::RequestWorkspace;
use crate::pipeline::silent_render::render_silent;
use crate::pipeline::soundtrack::Soundtrack;
use crate::pipeline::stage::StageResult;
use crate::pipeline::synthesize_video_use_case::{SynthesisOutput, SynthesisRequest};
use crate::rendering::domain::fallback_animation::FallbackAnimation;
use crate::rendering::domain::text_painter::TextPainter;
use crate::shared::pipeline_config::PipelineConfig;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriterFactory;

const SILENT_FILE_NAME: &str = "fallback_silent.mp4";

/// Produces a placeholder video without any generation backend: a
/// deterministic animation of the prompt, narrated if audio is enabled.
///
/// This is the last resort; its failures are returned to the caller.
pub struct FallbackVideoUseCase {
    painter: Arc<dyn TextPainter>,
    writer_factory: VideoWriterFactory,
    soundtrack: Arc<Soundtrack>,
    config: PipelineConfig,
}

impl FallbackVideoUseCase {
    pub fn new(
        painter: Arc<dyn TextPainter>,
        writer_factory: VideoWriterFactory,
        soundtrack: Arc<Soundtrack>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            painter,
            writer_factory,
            soundtrack,
            config,
        }
    }

    pub fn run(
        &self,
        request: &SynthesisRequest,
        workspace: &RequestWorkspace,
        logger: &mut dyn PipelineLogger,
    ) -> StageResult<SynthesisOutput> {
        let animation = FallbackAnimation::new(
            &self.painter,
            &request.prompt,
            self.config.width,
            self.config.height,
            self.config.fallback_frame_count(),
        );
        let metadata = VideoMetadata::new(
            animation.width(),
            animation.height(),
            f64::from(self.config.fallback_fps),
            animation.frame_count(),
        );

        let started = Instant::now();
        let silent = workspace.file(SILENT_FILE_NAME);
        let written = render_silent(
            &self.writer_factory,
            animation.frames(),
            &metadata,
            &silent,
            logger,
        )?;
        logger.timing("fallback_render", started.elapsed().as_secs_f64() * 1000.0);

        let outcome = self.soundtrack.finish(
            &request.text,
            request.enable_audio,
            &silent,
            &request.output_path,
            workspace,
            logger,
        )?;

        Ok(SynthesisOutput {
            video_path: request.output_path.clone(),
            has_audio: outcome.has_audio,
            used_fallback: true,
            frame_count: written,
        })
    }
}
