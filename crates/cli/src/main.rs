use std::path::PathBuf;
use std::process;

use clap::Parser;

use shorts_core::generation::infrastructure::diffusion_http_source::{
    DiffusionSettings, DEFAULT_DIFFUSION_URL,
};
use shorts_core::generation::infrastructure::registry_factory::{NarrationBackend, ProviderSettings};
use shorts_core::pipeline::infrastructure::default_synthesizer::build_default_synthesizer;
use shorts_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use shorts_core::pipeline::synthesize_video_use_case::{SynthesisRequest, VideoSynthesizer};
use shorts_core::shared::pipeline_config::PipelineConfig;
use shorts_core::text::domain::input_validator::validate_text_input;
use shorts_core::text::domain::segmenter::primary_prompt;

/// Generate a short narrated video from a text prompt.
#[derive(Parser)]
#[command(name = "shorts")]
struct Cli {
    /// Text describing the video. Also used for the caption and narration.
    text: String,

    /// Output video file (.mp4).
    output: PathBuf,

    /// Produce a silent video.
    #[arg(long)]
    no_audio: bool,

    /// Skip the diffusion backend and render the placeholder animation.
    #[arg(long)]
    fallback_only: bool,

    /// Pipeline config file (JSON). Defaults to the per-user config if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stable Diffusion WebUI base URL.
    #[arg(long, env = "DIFFUSION_URL", default_value = DEFAULT_DIFFUSION_URL)]
    diffusion_url: String,

    /// Checkpoint to activate before generating.
    #[arg(long)]
    checkpoint: Option<String>,

    /// Sampling steps per frame.
    #[arg(long, default_value = "30")]
    steps: u32,

    /// Classifier-free guidance scale.
    #[arg(long, default_value = "7.5")]
    guidance: f32,

    /// Narration backend: google or espeak.
    #[arg(long, default_value = "google")]
    narration: String,

    /// Narration language (google) or voice (espeak).
    #[arg(long, default_value = "en")]
    language: String,

    /// TrueType font for captions.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Never download the caption font.
    #[arg(long)]
    offline: bool,

    /// Video length in seconds (overrides the config file).
    #[arg(long)]
    duration: Option<u32>,

    /// Output frame rate (overrides the config file).
    #[arg(long)]
    fps: Option<u32>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let providers = build_providers(&cli)?;
    let synthesizer = build_default_synthesizer(config, &providers, !cli.offline);

    let request = SynthesisRequest {
        id: format!("cli-{}", process::id()),
        prompt: primary_prompt(&cli.text),
        text: cli.text.clone(),
        enable_audio: !cli.no_audio,
        output_path: cli.output.clone(),
    };

    let mut logger = StdoutPipelineLogger::default();
    let output = if cli.fallback_only {
        synthesizer.synthesize_fallback(&request, &mut logger)?
    } else {
        synthesizer.synthesize(&request, &mut logger)?
    };
    logger.summary();

    log::info!("Output written to {}", output.video_path.display());
    if output.used_fallback {
        log::warn!("Frame generation was unavailable; the placeholder animation was used");
    }
    if !cli.no_audio && !output.has_audio {
        log::warn!("Narration could not be added; the video is silent");
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::load_or_default(cli.config.as_deref())?;
    if let Some(duration) = cli.duration {
        config.target_duration_secs = duration;
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    config.validate()?;
    Ok(config)
}

fn build_providers(cli: &Cli) -> Result<ProviderSettings, Box<dyn std::error::Error>> {
    let narration: NarrationBackend = cli.narration.parse()?;
    Ok(ProviderSettings {
        diffusion: DiffusionSettings {
            base_url: cli.diffusion_url.clone(),
            checkpoint: cli.checkpoint.clone(),
            steps: cli.steps,
            guidance: cli.guidance,
            ..DiffusionSettings::default()
        },
        narration,
        language: cli.language.clone(),
        font_path: cli.font.clone(),
        ..ProviderSettings::default()
    })
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate_text_input(&cli.text)?;
    if cli.steps == 0 {
        return Err("Steps must be at least 1".into());
    }
    if cli.guidance.is_nan() || cli.guidance <= 0.0 {
        return Err(format!("Guidance must be positive, got {}", cli.guidance).into());
    }
    if let Some(font) = &cli.font {
        if !font.is_file() {
            return Err(format!("Font file not found: {}", font.display()).into());
        }
    }
    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(format!("Output directory not found: {}", parent.display()).into());
        }
    }
    Ok(())
}
