//! HTTP API over the video synthesis pipeline.

pub mod error;
pub mod handlers;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use shorts_core::library::domain::video_library::VideoLibrary;
use shorts_core::pipeline::create_video_use_case::CreateVideoUseCase;

/// Front-ends allowed to call the API with credentials.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://shorts-video-six.vercel.app",
    "https://shorts-video-alpha.vercel.app",
    "https://huggingface.co",
    "http://localhost:3000",
    "http://localhost:5173",
];

/// Directories under the storage root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageDirs {
    pub temp: PathBuf,
    pub videos: PathBuf,
    pub audio: PathBuf,
}

impl StorageDirs {
    pub fn under(root: &Path) -> Self {
        Self {
            temp: root.join("temp"),
            videos: root.join("videos"),
            audio: root.join("audio"),
        }
    }

    /// Creates every directory, keeping existing contents.
    pub fn create(&self) -> io::Result<()> {
        for dir in [&self.temp, &self.videos, &self.audio] {
            fs::create_dir_all(dir).map_err(|e| {
                io::Error::new(e.kind(), format!("Failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub create_video: Arc<CreateVideoUseCase>,
    pub library: Arc<dyn VideoLibrary>,
    /// Public base of the API, e.g. `http://localhost:5000/api`.
    pub api_url: String,
}

#[derive(Clone, Debug, Default)]
pub struct RouterOptions {
    /// Origins in addition to [`DEFAULT_CORS_ORIGINS`].
    pub extra_origins: Vec<String>,
    /// Front-end build served for every path the API does not handle.
    pub static_dir: Option<PathBuf>,
}

pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let api = Router::new()
        .route("/api", get(handlers::welcome))
        .route("/api/videos/generate", post(handlers::generate_video))
        .route("/api/videos", get(handlers::list_videos))
        .route("/api/videos/", get(handlers::list_videos))
        .route("/api/videos/:id", get(handlers::get_video))
        .with_state(state);

    let app = match options.static_dir.as_ref().filter(|dir| dir.is_dir()) {
        Some(dir) => {
            log::info!("Serving static files from {}", dir.display());
            api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => api.fallback(handlers::not_found),
    };
    app.layer(cors_layer(&options.extra_origins))
}

fn cors_layer(extra_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = DEFAULT_CORS_ORIGINS
        .iter()
        .copied()
        .chain(extra_origins.iter().map(String::as_str))
        .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION, header::RANGE])
}
