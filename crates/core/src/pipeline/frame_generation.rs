use std::time::Instant;

use image::imageops::{self, FilterType};

use crate::generation::domain::frame_prompt::FramePrompt;
use crate::generation::domain::frame_source::FrameSource;
use crate::pipeline::generation_budget::GenerationBudget;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::stage::{StageFailure, StageKind, StageResult};
use crate::shared::frame::Frame;

/// Shape of the key-frame sequence to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLoopSettings {
    pub target_frames: usize,
    pub min_frames: usize,
    pub width: u32,
    pub height: u32,
}

/// Generates key frames one at a time within `budget`.
///
/// Stops early once the deadline has passed and at least one frame exists,
/// then pads to `min_frames` by repeating the last frame. Any source error
/// aborts the loop.
pub fn generate_frames(
    source: &dyn FrameSource,
    prompt: &str,
    settings: &FrameLoopSettings,
    budget: &GenerationBudget,
    logger: &mut dyn PipelineLogger,
) -> StageResult<Vec<Frame>> {
    let mut frames: Vec<Frame> = Vec::with_capacity(settings.target_frames.max(settings.min_frames));
    let mut warned_soft = false;

    for i in 0..settings.target_frames {
        let now = Instant::now();
        if budget.is_exhausted(now) && !frames.is_empty() {
            log::warn!(
                "Generation budget exhausted after {:.0}s, stopping at {}/{} frames",
                budget.elapsed(now).as_secs_f64(),
                frames.len(),
                settings.target_frames
            );
            break;
        }
        if !warned_soft && budget.past_soft_checkpoint(now) {
            warned_soft = true;
            log::warn!(
                "Frame generation running long ({:.0}s elapsed, {:.0}s left)",
                budget.elapsed(now).as_secs_f64(),
                budget.remaining(now).as_secs_f64()
            );
        }

        let request = FramePrompt::for_frame(prompt, i, settings.width, settings.height);
        let started = Instant::now();
        let frame = source.generate(&request).map_err(|e| {
            StageFailure::new(
                StageKind::FrameGeneration,
                format!("frame {}/{} (seed {}): {e}", i + 1, settings.target_frames, request.seed),
            )
        })?;
        logger.timing("frame", started.elapsed().as_secs_f64() * 1000.0);

        frames.push(conform(frame, settings.width, settings.height, i)?);
        logger.progress("frames", i + 1, settings.target_frames);
    }

    let generated = frames.len();
    pad_frames(&mut frames, settings.min_frames, settings.width, settings.height);
    if frames.len() > generated {
        log::info!(
            "Padded {generated} generated frames to {}",
            frames.len()
        );
    }
    logger.metric("frames_generated", generated as f64);
    Ok(frames)
}

/// Extends `frames` to at least `min_frames` by repeating the last frame,
/// or an all-black frame when the sequence is empty.
pub fn pad_frames(frames: &mut Vec<Frame>, min_frames: usize, width: u32, height: u32) {
    while frames.len() < min_frames {
        let index = frames.len();
        let next = match frames.last() {
            Some(last) => last.clone().with_index(index),
            None => Frame::black(width, height, index),
        };
        frames.push(next);
    }
}

/// Resizes frames that come back at a different size than requested.
fn conform(frame: Frame, width: u32, height: u32, index: usize) -> StageResult<Frame> {
    if frame.width() == width && frame.height() == height && frame.channels() == 3 {
        return Ok(frame.with_index(index));
    }
    if frame.channels() != 3 {
        return Err(StageFailure::new(
            StageKind::FrameGeneration,
            format!("frame {index} has {} channels, expected RGB", frame.channels()),
        ));
    }

    log::debug!(
        "Resizing frame {index} from {}x{} to {width}x{height}",
        frame.width(),
        frame.height()
    );
    let (src_w, src_h) = (frame.width(), frame.height());
    let image = image::RgbImage::from_raw(src_w, src_h, frame.data().to_vec()).ok_or_else(|| {
        StageFailure::new(StageKind::FrameGeneration, format!("frame {index} has invalid pixel data"))
    })?;
    let resized = imageops::resize(&image, width, height, FilterType::Triangle);
    Ok(Frame::new(resized.into_raw(), width, height, 3, index))
}
