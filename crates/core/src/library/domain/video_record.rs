use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::domain::caption_text::title_for;

/// Persisted description of one generated video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub has_audio: bool,
    pub created_at: DateTime<Utc>,
    pub filename: String,
}

impl VideoRecord {
    pub fn new(id: Uuid, text: &str, has_audio: bool, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title_for(text),
            text: text.to_string(),
            has_audio,
            created_at,
            filename: video_filename(&id),
        }
    }
}

pub fn video_filename(id: &Uuid) -> String {
    format!("{id}.mp4")
}
