use crate::shared::constants::{NEGATIVE_PROMPT, QUALITY_SUFFIX, SEED_OFFSET, SEED_STRIDE};

/// Everything a frame source needs to render one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePrompt {
    pub prompt: String,
    pub negative_prompt: String,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
}

impl FramePrompt {
    /// Prompt for frame `index` of a sequence: quality phrases appended,
    /// fixed negative prompt, seed `index * 100 + 42`.
    pub fn for_frame(base_prompt: &str, index: usize, width: u32, height: u32) -> Self {
        Self {
            prompt: augment_prompt(base_prompt),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            seed: seed_for_frame(index),
            width,
            height,
        }
    }
}

pub fn seed_for_frame(index: usize) -> u64 {
    index as u64 * SEED_STRIDE + SEED_OFFSET
}

pub fn augment_prompt(base_prompt: &str) -> String {
    let base = base_prompt.trim();
    if base.is_empty() {
        QUALITY_SUFFIX.to_string()
    } else {
        format!("{base}, {QUALITY_SUFFIX}")
    }
}
