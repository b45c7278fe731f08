use std::path::Path;
use std::time::Instant;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::stage::{StageContext, StageFailure, StageKind, StageResult};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriterFactory;

/// Encodes `frames` to a silent video at `path`, returning the number of
/// frames written.
///
/// The writer is always closed, also when a frame fails to encode, so the
/// encoder never outlives the stage.
pub fn render_silent(
    writer_factory: &VideoWriterFactory,
    frames: impl Iterator<Item = Frame>,
    metadata: &VideoMetadata,
    path: &Path,
    logger: &mut dyn PipelineLogger,
) -> StageResult<usize> {
    let mut writer = writer_factory();
    writer.open(path, metadata).stage(StageKind::VideoEncoding)?;

    let started = Instant::now();
    let total = metadata.total_frames;
    let mut written = 0;
    let mut failure: Option<StageFailure> = None;
    for frame in frames {
        if let Err(e) = writer.write(&frame) {
            failure = Some(StageFailure::new(
                StageKind::VideoEncoding,
                format!("frame {written}: {e}"),
            ));
            break;
        }
        written += 1;
        logger.progress("encode", written, total);
    }

    let closed = writer.close().stage(StageKind::VideoEncoding);
    if let Some(failure) = failure {
        return Err(failure);
    }
    closed?;

    if written == 0 {
        return Err(StageFailure::new(
            StageKind::VideoEncoding,
            "no frames to encode",
        ));
    }
    logger.timing("encode", started.elapsed().as_secs_f64() * 1000.0);
    log::info!(
        "Rendered {written} frames at {} fps to {}",
        metadata.fps,
        path.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::video::domain::video_writer::VideoWriter;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        opened: Option<PathBuf>,
        written: Vec<usize>,
        closed: bool,
    }

    struct StubWriter {
        state: Arc<Mutex<Recorded>>,
        fail_at: Option<usize>,
    }

    impl VideoWriter for StubWriter {
        fn open(
            &mut self,
            path: &Path,
            _metadata: &VideoMetadata,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.state.lock().unwrap().opened = Some(path.to_path_buf());
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            let mut state = self.state.lock().unwrap();
            if Some(state.written.len()) == self.fail_at {
                return Err("encoder rejected frame".into());
            }
            state.written.push(frame.index());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.state.lock().unwrap().closed = true;
            Ok(())
        }
    }

    fn factory(fail_at: Option<usize>) -> (VideoWriterFactory, Arc<Mutex<Recorded>>) {
        let state = Arc::new(Mutex::new(Recorded::default()));
        let shared = state.clone();
        let factory: VideoWriterFactory = Arc::new(move || {
            Box::new(StubWriter {
                state: shared.clone(),
                fail_at,
            }) as Box<dyn VideoWriter>
        });
        (factory, state)
    }

    fn frames(n: usize) -> impl Iterator<Item = Frame> {
        (0..n).map(|i| Frame::black(4, 4, i))
    }

    #[test]
    fn test_writes_every_frame_and_closes() {
        let (factory, state) = factory(None);
        let metadata = VideoMetadata::new(4, 4, 24.0, 10);
        let written = render_silent(
            &factory,
            frames(10),
            &metadata,
            Path::new("/tmp/silent.mp4"),
            &mut NullPipelineLogger,
        )
        .unwrap();

        assert_eq!(written, 10);
        let state = state.lock().unwrap();
        assert_eq!(state.written, (0..10).collect::<Vec<_>>());
        assert_eq!(state.opened.as_deref(), Some(Path::new("/tmp/silent.mp4")));
        assert!(state.closed);
    }

    #[test]
    fn test_write_failure_still_closes_writer() {
        let (factory, state) = factory(Some(3));
        let metadata = VideoMetadata::new(4, 4, 24.0, 10);
        let failure = render_silent(
            &factory,
            frames(10),
            &metadata,
            Path::new("/tmp/silent.mp4"),
            &mut NullPipelineLogger,
        )
        .unwrap_err();

        assert_eq!(failure.kind, StageKind::VideoEncoding);
        assert!(failure.detail.contains("encoder rejected frame"));
        assert!(state.lock().unwrap().closed);
    }

    #[test]
    fn test_empty_sequence_is_a_failure() {
        let (factory, _) = factory(None);
        let metadata = VideoMetadata::new(4, 4, 24.0, 0);
        let failure = render_silent(
            &factory,
            frames(0),
            &metadata,
            Path::new("/tmp/silent.mp4"),
            &mut NullPipelineLogger,
        )
        .unwrap_err();
        assert_eq!(failure.kind, StageKind::VideoEncoding);
    }
}
