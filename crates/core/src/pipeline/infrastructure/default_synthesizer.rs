use std::sync::Arc;

use crate::generation::domain::capability_registry::CapabilityRegistry;
use crate::generation::infrastructure::registry_factory::{build_registry, ProviderSettings};
use crate::pipeline::audio_normalizer::AudioNormalizer;
use crate::pipeline::mux_stage::MuxStage;
use crate::pipeline::soundtrack::Soundtrack;
use crate::pipeline::synthesize_video_use_case::SynthesizeVideoUseCase;
use crate::rendering::infrastructure::painter_factory::create_text_painter;
use crate::shared::pipeline_config::PipelineConfig;
use crate::video::domain::video_writer::{VideoWriter, VideoWriterFactory};
use crate::video::infrastructure::ffmpeg_cli_tools::FfmpegCli;
use crate::video::infrastructure::ffmpeg_probe::FfmpegProbe;
use crate::video::infrastructure::ffmpeg_writer::FfmpegWriter;

/// Wires the production adapters: HTTP/subprocess providers behind a lazy
/// registry, in-process ffmpeg encoding and probing, and the ffmpeg
/// executable for looping and muxing.
pub fn build_default_synthesizer(
    config: PipelineConfig,
    providers: &ProviderSettings,
    allow_font_download: bool,
) -> SynthesizeVideoUseCase {
    let registry: Arc<dyn CapabilityRegistry> = Arc::new(build_registry(providers));
    build_synthesizer_with_registry(config, registry, providers, allow_font_download)
}

/// Same as [`build_default_synthesizer`] with a caller-supplied registry.
pub fn build_synthesizer_with_registry(
    config: PipelineConfig,
    registry: Arc<dyn CapabilityRegistry>,
    providers: &ProviderSettings,
    allow_font_download: bool,
) -> SynthesizeVideoUseCase {
    let painter = create_text_painter(providers.font_path.as_deref(), allow_font_download);
    let ffmpeg = Arc::new(FfmpegCli::new());
    if !ffmpeg.is_available() {
        log::warn!("ffmpeg executable not found; narrated videos will be published silent");
    }

    let writer_factory: VideoWriterFactory =
        Arc::new(|| Box::new(FfmpegWriter::new()) as Box<dyn VideoWriter>);
    let soundtrack = Soundtrack::new(
        registry.clone(),
        AudioNormalizer::new(
            Arc::new(FfmpegProbe::new()),
            ffmpeg.clone(),
            config.target_duration(),
        ),
        MuxStage::new(ffmpeg, config.target_duration()),
    );

    SynthesizeVideoUseCase::new(config, registry, painter, writer_factory, soundtrack)
}
