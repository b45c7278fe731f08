use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::library::domain::video_library::{LibraryError, VideoLibrary};
use crate::library::domain::video_record::{video_filename, VideoRecord};

/// Videos as `<dir>/<id>.mp4`, records as `<dir>/metadata/<id>.json`.
pub struct FileVideoLibrary {
    videos_dir: PathBuf,
    metadata_dir: PathBuf,
}

impl FileVideoLibrary {
    /// Opens the library, creating its directories if needed.
    pub fn open(videos_dir: &Path) -> Result<Self, LibraryError> {
        let metadata_dir = videos_dir.join("metadata");
        fs::create_dir_all(&metadata_dir).map_err(|e| LibraryError::Io {
            path: metadata_dir.clone(),
            source: e,
        })?;
        Ok(Self {
            videos_dir: videos_dir.to_path_buf(),
            metadata_dir,
        })
    }

    pub fn videos_dir(&self) -> &Path {
        &self.videos_dir
    }

    fn record_path(&self, id: &Uuid) -> PathBuf {
        self.metadata_dir.join(format!("{id}.json"))
    }

    fn read_record(path: &Path) -> Option<VideoRecord> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Skipping unreadable record {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed record {}: {e}", path.display());
                None
            }
        }
    }
}

impl VideoLibrary for FileVideoLibrary {
    fn video_path(&self, id: &Uuid) -> PathBuf {
        self.videos_dir.join(video_filename(id))
    }

    fn save(&self, record: &VideoRecord) -> Result<(), LibraryError> {
        let json = serde_json::to_vec_pretty(record).map_err(|e| LibraryError::Encode {
            id: record.id,
            source: e,
        })?;

        let path = self.record_path(&record.id);
        let temp_path = path.with_extension("json.part");
        let io_error = |p: &Path, e: std::io::Error| LibraryError::Io {
            path: p.to_path_buf(),
            source: e,
        };
        let mut file = fs::File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;
        file.write_all(&json).map_err(|e| io_error(&temp_path, e))?;
        file.flush().map_err(|e| io_error(&temp_path, e))?;
        drop(file);
        fs::rename(&temp_path, &path).map_err(|e| io_error(&path, e))?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<VideoRecord>, LibraryError> {
        let entries = fs::read_dir(&self.metadata_dir).map_err(|e| LibraryError::Io {
            path: self.metadata_dir.clone(),
            source: e,
        })?;

        let mut records: Vec<VideoRecord> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| Self::read_record(&path))
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn find_video(&self, id: &str) -> Option<PathBuf> {
        let id = Uuid::parse_str(id).ok()?;
        let path = self.video_path(&id);
        path.is_file().then_some(path)
    }
}
