use crate::shared::frame::Frame;

/// Size of a rendered line of text in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Measures and rasterizes single lines of text onto frames.
pub trait TextPainter: Send + Sync {
    fn measure(&self, text: &str, size: f32) -> TextExtent;

    /// Draws `text` with its top-left corner at `(x, y)`. Pixels falling
    /// outside the frame are clipped.
    fn draw(&self, frame: &mut Frame, x: i32, y: i32, text: &str, size: f32, color: [u8; 3]);
}
