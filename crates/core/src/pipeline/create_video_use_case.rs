use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::library::domain::video_library::{LibraryError, VideoLibrary};
use crate::library::domain::video_record::VideoRecord;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::stage::SynthesisError;
use crate::pipeline::synthesize_video_use_case::{SynthesisRequest, VideoSynthesizer};
use crate::text::domain::input_validator::{validate_text_input, InputError};
use crate::text::domain::segmenter::primary_prompt;

#[derive(Error, Debug)]
pub enum CreateVideoError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Handles one "make a video from this text" request end to end: validate,
/// synthesize into the library, record it.
pub struct CreateVideoUseCase {
    synthesizer: Arc<dyn VideoSynthesizer>,
    library: Arc<dyn VideoLibrary>,
}

impl CreateVideoUseCase {
    pub fn new(synthesizer: Arc<dyn VideoSynthesizer>, library: Arc<dyn VideoLibrary>) -> Self {
        Self {
            synthesizer,
            library,
        }
    }

    pub fn execute(
        &self,
        text: &str,
        enable_audio: bool,
        logger: &mut dyn PipelineLogger,
    ) -> Result<VideoRecord, CreateVideoError> {
        validate_text_input(text)?;

        let id = Uuid::new_v4();
        let request = SynthesisRequest {
            id: id.to_string(),
            prompt: primary_prompt(text),
            text: text.to_string(),
            enable_audio,
            output_path: self.library.video_path(&id),
        };
        log::info!("Generating video {id} (audio: {enable_audio})");

        let output = self.synthesizer.synthesize(&request, logger)?;
        let record = VideoRecord::new(id, text, output.has_audio, Utc::now());
        self.library.save(&record)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::infrastructure::file_video_library::FileVideoLibrary;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::pipeline::stage::{StageFailure, StageKind};
    use crate::pipeline::synthesize_video_use_case::SynthesisOutput;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StubSynthesizer {
        requests: Mutex<Vec<SynthesisRequest>>,
        has_audio: bool,
        fail: bool,
    }

    impl StubSynthesizer {
        fn new(has_audio: bool, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                has_audio,
                fail,
            })
        }
    }

    impl VideoSynthesizer for StubSynthesizer {
        fn synthesize(
            &self,
            request: &SynthesisRequest,
            _logger: &mut dyn PipelineLogger,
        ) -> Result<SynthesisOutput, SynthesisError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(SynthesisError::Fallback(StageFailure::new(
                    StageKind::VideoEncoding,
                    "no encoder",
                )));
            }
            fs::write(&request.output_path, b"video").unwrap();
            Ok(SynthesisOutput {
                video_path: request.output_path.clone(),
                has_audio: self.has_audio,
                used_fallback: false,
                frame_count: 720,
            })
        }
    }

    fn library(tmp: &TempDir) -> Arc<FileVideoLibrary> {
        Arc::new(FileVideoLibrary::open(&tmp.path().join("videos")).unwrap())
    }

    #[test]
    fn test_empty_text_never_reaches_synthesizer() {
        let tmp = TempDir::new().unwrap();
        let synthesizer = StubSynthesizer::new(true, false);
        let use_case = CreateVideoUseCase::new(synthesizer.clone(), library(&tmp));

        let err = use_case.execute("", true, &mut NullPipelineLogger).unwrap_err();

        assert!(matches!(err, CreateVideoError::InvalidInput(InputError::Empty)));
        assert!(synthesizer.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_successful_request_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let synthesizer = StubSynthesizer::new(false, false);
        let library = library(&tmp);
        let use_case = CreateVideoUseCase::new(synthesizer.clone(), library.clone());

        let record = use_case
            .execute("A cat playing piano. It is very good at it.", true, &mut NullPipelineLogger)
            .unwrap();

        assert!(!record.has_audio);
        assert_eq!(record.filename, format!("{}.mp4", record.id));
        let requests = synthesizer.requests.lock().unwrap();
        assert_eq!(requests[0].id, record.id.to_string());
        assert!(requests[0].enable_audio);
        assert_eq!(requests[0].text, "A cat playing piano. It is very good at it.");
        assert_eq!(requests[0].output_path, library.video_path(&record.id));

        let listed = library.list().unwrap();
        assert_eq!(listed, vec![record.clone()]);
        assert!(library.find_video(&record.id.to_string()).is_some());
    }

    #[test]
    fn test_synthesis_failure_saves_nothing() {
        let tmp = TempDir::new().unwrap();
        let library = library(&tmp);
        let use_case = CreateVideoUseCase::new(StubSynthesizer::new(true, true), library.clone());

        let err = use_case
            .execute("A cat playing piano", true, &mut NullPipelineLogger)
            .unwrap_err();

        assert!(matches!(err, CreateVideoError::Synthesis(_)));
        assert!(library.list().unwrap().is_empty());
    }
}
