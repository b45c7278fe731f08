use ndarray::Zip;
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("frame {index} is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32, u8),
        actual: (u32, u32, u8),
    },
    #[error("frame position {position} out of range 0..{len}")]
    OutOfRange { position: usize, len: usize },
}

/// Stretches a short key-frame sequence to `total` frames by linear
/// cross-fading between neighbours.
///
/// Output frame `k` samples position `k / (total - 1) * (len - 1)` in the
/// key-frame sequence, so the first and last outputs are exact copies of the
/// first and last key frames. Sequences shorter than two frames are passed
/// through unchanged. Frames are produced on demand so long outputs never
/// need to be resident at once.
pub struct FrameInterpolator<'a> {
    frames: &'a [Frame],
    total: usize,
}

impl<'a> FrameInterpolator<'a> {
    pub fn new(frames: &'a [Frame], total: usize) -> Result<Self, InterpolationError> {
        if let Some(first) = frames.first() {
            for (index, frame) in frames.iter().enumerate() {
                if !frame.same_dimensions(first) {
                    return Err(InterpolationError::DimensionMismatch {
                        index,
                        expected: (first.width(), first.height(), first.channels()),
                        actual: (frame.width(), frame.height(), frame.channels()),
                    });
                }
            }
        }
        Ok(Self { frames, total })
    }

    /// Number of frames this interpolator yields.
    pub fn len(&self) -> usize {
        if self.frames.len() < 2 {
            self.frames.len()
        } else {
            self.total
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frame_at(&self, k: usize) -> Result<Frame, InterpolationError> {
        let len = self.len();
        if k >= len {
            return Err(InterpolationError::OutOfRange { position: k, len });
        }
        Ok(self.render(k))
    }

    /// Yields every output frame in order; each `k` is in range by
    /// construction.
    pub fn iter(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.len()).map(move |k| self.render(k))
    }

    /// Requires `k < self.len()`.
    fn render(&self, k: usize) -> Frame {
        if self.frames.len() < 2 {
            return self.frames[k].clone();
        }

        let (i0, i1, weight) = sample_position(k, self.total, self.frames.len());
        if i0 == i1 || weight == 0.0 {
            return self.frames[i0].clone().with_index(k);
        }
        blend(&self.frames[i0], &self.frames[i1], weight, k)
    }
}

/// Collects the full interpolated sequence.
pub fn interpolate(frames: &[Frame], total: usize) -> Result<Vec<Frame>, InterpolationError> {
    if frames.len() < 2 {
        return Ok(frames.to_vec());
    }
    let interpolator = FrameInterpolator::new(frames, total)?;
    Ok(interpolator.iter().collect())
}

/// `(i0, i1, w)` for output frame `k`. Integer arithmetic keeps exact
/// key-frame positions exact.
fn sample_position(k: usize, total: usize, len: usize) -> (usize, usize, f64) {
    if total <= 1 {
        return (0, 0, 0.0);
    }
    let span = total - 1;
    let scaled = k * (len - 1);
    let i0 = (scaled / span).min(len - 1);
    let i1 = (i0 + 1).min(len - 1);
    let weight = (scaled % span) as f64 / span as f64;
    (i0, i1, weight)
}

fn blend(a: &Frame, b: &Frame, weight: f64, index: usize) -> Frame {
    let mut out = a.clone().with_index(index);
    Zip::from(out.as_ndarray_mut())
        .and(b.as_ndarray())
        .for_each(|dst, &src| {
            let value = (1.0 - weight) * f64::from(*dst) + weight * f64::from(src);
            *dst = value.round().clamp(0.0, 255.0) as u8;
        });
    out
}
