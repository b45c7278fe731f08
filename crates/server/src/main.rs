use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use shorts_core::generation::infrastructure::diffusion_http_source::{
    DiffusionSettings, DEFAULT_DIFFUSION_URL,
};
use shorts_core::generation::infrastructure::registry_factory::{NarrationBackend, ProviderSettings};
use shorts_core::library::infrastructure::file_video_library::FileVideoLibrary;
use shorts_core::pipeline::create_video_use_case::CreateVideoUseCase;
use shorts_core::pipeline::infrastructure::default_synthesizer::build_default_synthesizer;
use shorts_core::shared::pipeline_config::PipelineConfig;
use shorts_server::{router, AppState, RouterOptions, StorageDirs};

/// HTTP API for generating and browsing short videos.
#[derive(Parser)]
#[command(name = "shorts-server")]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Root for temp files and generated videos.
    #[arg(long, env = "STORAGE_DIR", default_value = "storage")]
    storage_dir: PathBuf,

    /// Public base URL of the API, used in returned video links.
    #[arg(long, env = "API_URL", default_value = "http://localhost:5000/api")]
    api_url: String,

    /// Front-end build to serve for non-API paths.
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Extra allowed CORS origins (comma-separated).
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origin: Vec<String>,

    /// Pipeline config file (JSON).
    #[arg(long, env = "PIPELINE_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "DIFFUSION_URL", default_value = DEFAULT_DIFFUSION_URL)]
    diffusion_url: String,

    #[arg(long, env = "DIFFUSION_CHECKPOINT")]
    checkpoint: Option<String>,

    /// Narration backend: google or espeak.
    #[arg(long, env = "NARRATION_BACKEND", default_value = "google")]
    narration: String,

    #[arg(long, env = "NARRATION_LANGUAGE", default_value = "en")]
    language: String,

    /// TrueType font for captions.
    #[arg(long, env = "CAPTION_FONT")]
    font: Option<PathBuf>,

    /// Never download the caption font.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let storage = StorageDirs::under(&args.storage_dir);
    storage.create()?;
    log::info!("Storage at {}", args.storage_dir.display());

    let mut config = PipelineConfig::load_or_default(args.config.as_deref())?;
    config.temp_dir = storage.temp.clone();
    config.validate()?;

    let providers = ProviderSettings {
        diffusion: DiffusionSettings {
            base_url: args.diffusion_url.clone(),
            checkpoint: args.checkpoint.clone(),
            ..DiffusionSettings::default()
        },
        narration: args.narration.parse::<NarrationBackend>()?,
        language: args.language.clone(),
        font_path: args.font.clone(),
        ..ProviderSettings::default()
    };

    // Font lookup may download over blocking HTTP.
    let allow_download = !args.offline;
    let synthesizer = tokio::task::spawn_blocking(move || {
        build_default_synthesizer(config, &providers, allow_download)
    })
    .await?;

    let library = Arc::new(FileVideoLibrary::open(&storage.videos)?);
    let state = AppState {
        create_video: Arc::new(CreateVideoUseCase::new(Arc::new(synthesizer), library.clone())),
        library,
        api_url: args.api_url.clone(),
    };
    let options = RouterOptions {
        extra_origins: args.cors_origin.clone(),
        static_dir: Some(args.static_dir.clone()),
    };
    let app = router(state, &options);

    let bind = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| format!("Failed to bind {bind}: {e}"))?;
    log::info!("Listening on http://{bind} (API at {})", args.api_url);

    axum::serve(listener, app).await?;
    Ok(())
}
