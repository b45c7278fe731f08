use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::pipeline::stage::{StageFailure, StageKind, StageResult};
use crate::video::domain::media_tools::Muxer;

const MUXED_FILE_NAME: &str = "muxed.mp4";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MuxOutcome {
    pub has_audio: bool,
}

/// Moves a finished file into place, copying when `rename` cannot cross
/// filesystems.
pub fn promote(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({rename_err}), copying",
                from.display(),
                to.display()
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Final stage: joins the silent render with narration, or publishes the
/// silent render on its own when there is no audio or muxing fails.
pub struct MuxStage {
    muxer: Arc<dyn Muxer>,
    duration_secs: f64,
}

impl MuxStage {
    pub fn new(muxer: Arc<dyn Muxer>, duration_secs: f64) -> Self {
        Self {
            muxer,
            duration_secs,
        }
    }

    pub fn finalize(
        &self,
        silent: &Path,
        audio: Option<&Path>,
        final_path: &Path,
        workdir: &Path,
    ) -> StageResult<MuxOutcome> {
        if !silent.is_file() {
            return Err(StageFailure::new(
                StageKind::Muxing,
                format!("silent video {} is missing", silent.display()),
            ));
        }

        if let Some(audio) = audio {
            let muxed = workdir.join(MUXED_FILE_NAME);
            match self.muxer.mux(silent, audio, &muxed, self.duration_secs) {
                Ok(()) => {
                    promote(&muxed, final_path).map_err(|e| publish_failure(final_path, e))?;
                    return Ok(MuxOutcome { has_audio: true });
                }
                Err(e) => {
                    log::warn!("Muxing failed, publishing silent video: {e}");
                    // A failed muxer may leave a truncated file behind.
                    if let Err(e) = fs::remove_file(&muxed) {
                        if e.kind() != io::ErrorKind::NotFound {
                            log::debug!("Could not remove {}: {e}", muxed.display());
                        }
                    }
                }
            }
        }

        if silent != final_path {
            promote(silent, final_path).map_err(|e| publish_failure(final_path, e))?;
        }
        Ok(MuxOutcome { has_audio: false })
    }
}

fn publish_failure(final_path: &Path, e: io::Error) -> StageFailure {
    StageFailure::new(
        StageKind::Muxing,
        format!("could not move output to {}: {e}", final_path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes `audio+video` bytes to the output, or fails.
    struct StubMuxer {
        fail: bool,
        calls: Mutex<Vec<f64>>,
    }

    impl StubMuxer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl Muxer for StubMuxer {
        fn mux(
            &self,
            _video: &Path,
            _audio: &Path,
            output: &Path,
            duration_secs: f64,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.calls.lock().unwrap().push(duration_secs);
            if self.fail {
                fs::write(output, b"partial")?;
                return Err("ffmpeg exited with status 1".into());
            }
            fs::write(output, b"muxed")?;
            Ok(())
        }
    }

    struct Fixture {
        _tmp: TempDir,
        work: std::path::PathBuf,
        silent: std::path::PathBuf,
        audio: std::path::PathBuf,
        final_path: std::path::PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        let silent = work.join("silent.mp4");
        let audio = work.join("narration.mp3");
        fs::write(&silent, b"silent").unwrap();
        fs::write(&audio, b"audio").unwrap();
        let final_path = tmp.path().join("videos").join("out.mp4");
        Fixture {
            work,
            silent,
            audio,
            final_path,
            _tmp: tmp,
        }
    }

    #[test]
    fn test_successful_mux_is_published() {
        let f = fixture();
        let muxer = StubMuxer::new(false);
        let outcome = MuxStage::new(muxer.clone(), 30.0)
            .finalize(&f.silent, Some(&f.audio), &f.final_path, &f.work)
            .unwrap();

        assert!(outcome.has_audio);
        assert_eq!(fs::read(&f.final_path).unwrap(), b"muxed");
        assert!(!f.work.join(MUXED_FILE_NAME).exists());
        assert_eq!(*muxer.calls.lock().unwrap(), vec![30.0]);
    }

    #[test]
    fn test_mux_failure_promotes_silent_video() {
        let f = fixture();
        let outcome = MuxStage::new(StubMuxer::new(true), 30.0)
            .finalize(&f.silent, Some(&f.audio), &f.final_path, &f.work)
            .unwrap();

        assert!(!outcome.has_audio);
        assert_eq!(fs::read(&f.final_path).unwrap(), b"silent");
        assert!(!f.work.join(MUXED_FILE_NAME).exists());
    }

    #[test]
    fn test_no_audio_skips_muxer() {
        let f = fixture();
        let muxer = StubMuxer::new(false);
        let outcome = MuxStage::new(muxer.clone(), 30.0)
            .finalize(&f.silent, None, &f.final_path, &f.work)
            .unwrap();

        assert!(!outcome.has_audio);
        assert!(muxer.calls.lock().unwrap().is_empty());
        assert_eq!(fs::read(&f.final_path).unwrap(), b"silent");
    }

    #[test]
    fn test_missing_silent_video_is_a_failure() {
        let f = fixture();
        fs::remove_file(&f.silent).unwrap();
        let failure = MuxStage::new(StubMuxer::new(false), 30.0)
            .finalize(&f.silent, Some(&f.audio), &f.final_path, &f.work)
            .unwrap_err();
        assert_eq!(failure.kind, StageKind::Muxing);
        assert!(!f.final_path.exists());
    }

    #[test]
    fn test_promote_creates_parent_and_moves() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("a.mp4");
        let to = tmp.path().join("deep").join("b.mp4");
        fs::write(&from, b"x").unwrap();
        promote(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"x");
    }
}
