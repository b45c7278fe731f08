/// Appended to every frame prompt.
pub const QUALITY_SUFFIX: &str =
    "high quality, detailed, cinematic lighting, professional photography, 4k, sharp focus";

pub const NEGATIVE_PROMPT: &str = "blurry, low quality, distorted, deformed, watermark, text, \
     signature, ugly, bad anatomy, duplicate, cropped, out of frame";

/// Frame `i` is generated with seed `i * SEED_STRIDE + SEED_OFFSET`.
pub const SEED_STRIDE: u64 = 100;
pub const SEED_OFFSET: u64 = 42;

pub const BASE_FRAME_COUNT: usize = 5;
pub const MIN_FRAME_COUNT: usize = 5;

pub const FRAME_WIDTH: u32 = 512;
pub const FRAME_HEIGHT: u32 = 512;

pub const TARGET_DURATION_SECS: u32 = 30;
pub const OUTPUT_FPS: u32 = 24;
pub const FALLBACK_FPS: u32 = 12;

pub const GENERATION_BUDGET_SECS: u64 = 420;
pub const SOFT_CHECKPOINT_SECS: u64 = 300;

pub const CAPTION_MAX_CHARS: usize = 50;
pub const CAPTION_ELLIPSIS: &str = "...";
pub const CAPTION_BOX_ALPHA: u8 = 180;
pub const CAPTION_BOTTOM_OFFSET: u32 = 60;
pub const CAPTION_PADDING: u32 = 10;
pub const CAPTION_FONT_SIZE: f32 = 24.0;

pub const FALLBACK_TITLE: &str = "Video Generation";
pub const FALLBACK_BACKGROUND: [u8; 3] = [25, 25, 50];
pub const FALLBACK_MARKER_COLORS: [[u8; 3]; 5] = [
    [255, 200, 0],
    [0, 200, 255],
    [200, 0, 255],
    [0, 255, 100],
    [255, 100, 100],
];
pub const FALLBACK_MARKER_RADIUS: u32 = 15;
pub const FALLBACK_WRAP_WIDTH: usize = 40;
pub const FALLBACK_TITLE_SIZE: f32 = 30.0;
pub const FALLBACK_BODY_SIZE: f32 = 20.0;

pub const VIDEO_CRF: u32 = 23;
pub const VIDEO_PRESET: &str = "medium";
pub const AUDIO_BITRATE: &str = "192k";

pub const MIN_INPUT_CHARS: usize = 10;
pub const MAX_INPUT_CHARS: usize = 5000;
pub const SEGMENT_MAX_CHARS: usize = 200;

pub const CAPTION_FONT_NAME: &str = "DejaVuSans.ttf";
pub const CAPTION_FONT_URL: &str =
    "https://github.com/prawnpdf/prawn/raw/master/data/fonts/DejaVuSans.ttf";

/// Checked in order when no font path is configured and nothing is cached.
pub const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/Library/Fonts",
    "C:\\Windows\\Fonts",
];
