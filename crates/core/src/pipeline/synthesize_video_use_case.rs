use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::generation::domain::capability_registry::CapabilityRegistry;
use crate::pipeline::fallback_video_use_case::FallbackVideoUseCase;
use crate::pipeline::frame_generation::{generate_frames, FrameLoopSettings};
use crate::pipeline::generation_budget::GenerationBudget;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::request_workspace::RequestWorkspace;
use crate::pipeline::silent_render::render_silent;
use crate::pipeline::soundtrack::Soundtrack;
use crate::pipeline::stage::{StageContext, StageKind, StageResult, SynthesisError};
use crate::rendering::domain::caption_overlay::CaptionOverlay;
use crate::rendering::domain::frame_interpolator::FrameInterpolator;
use crate::rendering::domain::text_painter::TextPainter;
use crate::shared::frame::Frame;
use crate::shared::pipeline_config::PipelineConfig;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriterFactory;

const SILENT_FILE_NAME: &str = "silent.mp4";

/// One video to produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Names the request workspace; unique per request.
    pub id: String,
    /// Image prompt (usually the first text segment).
    pub prompt: String,
    /// Full text, used for the caption and the narration.
    pub text: String,
    pub enable_audio: bool,
    pub output_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisOutput {
    pub video_path: PathBuf,
    /// True only when narration was actually muxed into the file.
    pub has_audio: bool,
    pub used_fallback: bool,
    pub frame_count: usize,
}

/// Seam between request handling and the media pipeline.
pub trait VideoSynthesizer: Send + Sync {
    fn synthesize(
        &self,
        request: &SynthesisRequest,
        logger: &mut dyn PipelineLogger,
    ) -> Result<SynthesisOutput, SynthesisError>;
}

/// Text to finished video file.
///
/// Primary path: key frames from the frame source within the generation
/// budget, captions, interpolation to `duration * fps` frames, silent
/// render, then narration and muxing. Any stage failure on that path
/// switches to the fallback animation; only a fallback failure reaches the
/// caller.
pub struct SynthesizeVideoUseCase {
    config: PipelineConfig,
    registry: Arc<dyn CapabilityRegistry>,
    captions: CaptionOverlay,
    writer_factory: VideoWriterFactory,
    soundtrack: Arc<Soundtrack>,
    fallback: FallbackVideoUseCase,
}

impl SynthesizeVideoUseCase {
    pub fn new(
        config: PipelineConfig,
        registry: Arc<dyn CapabilityRegistry>,
        painter: Arc<dyn TextPainter>,
        writer_factory: VideoWriterFactory,
        soundtrack: Soundtrack,
    ) -> Self {
        let soundtrack = Arc::new(soundtrack);
        let fallback = FallbackVideoUseCase::new(
            painter.clone(),
            writer_factory.clone(),
            soundtrack.clone(),
            config.clone(),
        );
        Self {
            captions: CaptionOverlay::new(painter, config.caption_font_size),
            config,
            registry,
            writer_factory,
            soundtrack,
            fallback,
        }
    }

    /// Skips the generation backends and renders the fallback animation.
    pub fn synthesize_fallback(
        &self,
        request: &SynthesisRequest,
        logger: &mut dyn PipelineLogger,
    ) -> Result<SynthesisOutput, SynthesisError> {
        let workspace = self.workspace_for(request)?;
        let result = self
            .fallback
            .run(request, &workspace, logger)
            .map_err(SynthesisError::Fallback);
        release(workspace);
        result
    }

    fn workspace_for(&self, request: &SynthesisRequest) -> Result<RequestWorkspace, SynthesisError> {
        RequestWorkspace::create(&self.config.temp_dir, &request.id).map_err(SynthesisError::Workspace)
    }

    fn run_primary(
        &self,
        request: &SynthesisRequest,
        workspace: &RequestWorkspace,
        logger: &mut dyn PipelineLogger,
    ) -> StageResult<SynthesisOutput> {
        let source = self
            .registry
            .frame_source()
            .stage(StageKind::FrameGeneration)?;

        let budget = GenerationBudget::starting_now(
            self.config.generation_budget(),
            self.config.soft_checkpoint(),
        );
        let settings = FrameLoopSettings {
            target_frames: self.config.base_frames,
            min_frames: self.config.min_frames,
            width: self.config.width,
            height: self.config.height,
        };
        let frames = generate_frames(source.as_ref(), &request.prompt, &settings, &budget, logger)?;
        logger.info(&format!("Generated {} key frames", frames.len()));

        let captioned: Vec<Frame> = frames
            .iter()
            .map(|frame| self.captions.apply(frame, &request.text))
            .collect();
        drop(frames);

        let interpolator = FrameInterpolator::new(&captioned, self.config.target_frame_count())
            .stage(StageKind::Interpolation)?;
        let metadata = VideoMetadata::new(
            self.config.width,
            self.config.height,
            f64::from(self.config.fps),
            interpolator.len(),
        );

        let silent = workspace.file(SILENT_FILE_NAME);
        let written = render_silent(
            &self.writer_factory,
            interpolator.iter(),
            &metadata,
            &silent,
            logger,
        )?;

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
            used_fallback: false,
            frame_count: written,
        })
    }
}

impl VideoSynthesizer for SynthesizeVideoUseCase {
    fn synthesize(
        &self,
        request: &SynthesisRequest,
        logger: &mut dyn PipelineLogger,
    ) -> Result<SynthesisOutput, SynthesisError> {
        let workspace = self.workspace_for(request)?;
        let started = Instant::now();

        let result = match self.run_primary(request, &workspace, logger) {
            Ok(output) => Ok(output),
            Err(failure) => {
                log::error!("{failure}; switching to fallback video");
                logger.info("Using fallback video");
                self.fallback
                    .run(request, &workspace, logger)
                    .map_err(SynthesisError::Fallback)
            }
        };

        release(workspace);
        logger.timing("synthesis", started.elapsed().as_secs_f64() * 1000.0);
        if let Ok(output) = &result {
            log::info!(
                "Video ready at {} ({} frames, audio: {}, fallback: {})",
                output.video_path.display(),
                output.frame_count,
                output.has_audio,
                output.used_fallback
            );
        }
        result
    }
}

fn release(workspace: RequestWorkspace) {
    let path = workspace.path().to_path_buf();
    if let Err(e) = workspace.close() {
        log::warn!("Could not remove workspace {}: {e}", path.display());
    }
}
