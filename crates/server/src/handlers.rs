use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::services::ServeFile;

use shorts_core::library::domain::video_record::VideoRecord;
use shorts_core::pipeline::create_video_use_case::CreateVideoError;
use shorts_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub text: String,
    #[serde(default)]
    pub enable_audio: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub id: String,
    pub video_url: String,
    pub title: String,
    pub has_audio: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoListItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub created_at: String,
}

pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Shorts Video API" }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found")
}

pub async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    let enable_audio = request.enable_audio.unwrap_or(true);
    let use_case = state.create_video.clone();

    let result = tokio::task::spawn_blocking(move || {
        let mut logger = StdoutPipelineLogger::default();
        let result = use_case.execute(&request.text, enable_audio, &mut logger);
        logger.summary();
        result
    })
    .await
    .map_err(|e| {
        log::error!("Generation task failed: {e}");
        ApiError::Internal("Failed to generate video")
    })?;

    match result {
        Ok(record) => Ok((
            StatusCode::CREATED,
            Json(GenerateResponse {
                id: record.id.to_string(),
                video_url: video_url(&state.api_url, &record),
                title: record.title,
                has_audio: record.has_audio,
            }),
        )),
        Err(CreateVideoError::InvalidInput(e)) => Err(ApiError::BadRequest(e.to_string())),
        Err(e) => {
            log::error!("Error generating video: {e}");
            Err(ApiError::Internal("Failed to generate video"))
        }
    }
}

pub async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoListItem>>, ApiError> {
    let library = state.library.clone();
    let records = tokio::task::spawn_blocking(move || library.list())
        .await
        .map_err(|e| {
            log::error!("Listing task failed: {e}");
            ApiError::Internal("Failed to fetch videos")
        })?
        .map_err(|e| {
            log::error!("Error fetching videos: {e}");
            ApiError::Internal("Failed to fetch videos")
        })?;

    let items = records
        .iter()
        .map(|record| VideoListItem {
            id: record.id.to_string(),
            title: record.title.clone(),
            url: video_url(&state.api_url, record),
            created_at: record.created_at.to_rfc3339(),
        })
        .collect();
    Ok(Json(items))
}

/// Streams the video file; honours range requests.
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = state
        .library
        .find_video(&id)
        .ok_or(ApiError::NotFound("Video not found"))?;

    let mut service = ServeFile::new(path);
    match service.try_call(request).await {
        Ok(response) => Ok(response.map(Body::new).into_response()),
        Err(e) => {
            log::error!("Error fetching video {id}: {e}");
            Err(ApiError::Internal("Failed to fetch video"))
        }
    }
}

fn video_url(api_url: &str, record: &VideoRecord) -> String {
    format!("{}/videos/{}", api_url.trim_end_matches('/'), record.id)
}
