use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::library::domain::video_record::VideoRecord;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode record {id}: {source}")]
    Encode {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
}

/// Where finished videos and their records live.
pub trait VideoLibrary: Send + Sync {
    /// Destination path for the video file of `id`.
    fn video_path(&self, id: &Uuid) -> PathBuf;

    fn save(&self, record: &VideoRecord) -> Result<(), LibraryError>;

    /// All records, newest first. Unreadable records are skipped.
    fn list(&self) -> Result<Vec<VideoRecord>, LibraryError>;

    /// Path of an existing video file. `None` for unknown or malformed ids.
    fn find_video(&self, id: &str) -> Option<PathBuf>;
}
