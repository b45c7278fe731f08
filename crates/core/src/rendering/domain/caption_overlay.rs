use std::sync::Arc;

use crate::rendering::domain::canvas::{fill_rect_alpha, Rect};
use crate::rendering::domain::text_painter::TextPainter;
use crate::shared::constants::{CAPTION_BOTTOM_OFFSET, CAPTION_BOX_ALPHA, CAPTION_PADDING};
use crate::shared::frame::Frame;
use crate::text::domain::caption_text::caption_for;

const CAPTION_COLOR: [u8; 3] = [255, 255, 255];
const BOX_COLOR: [u8; 3] = [0, 0, 0];

/// Where the caption text and its backdrop land on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionLayout {
    pub text_x: i32,
    pub text_y: i32,
    pub backdrop: Rect,
}

/// Burns a truncated caption into frames: white text over a translucent
/// black box, centred horizontally, `CAPTION_BOTTOM_OFFSET` px above the
/// bottom edge.
pub struct CaptionOverlay {
    painter: Arc<dyn TextPainter>,
    font_size: f32,
}

impl CaptionOverlay {
    pub fn new(painter: Arc<dyn TextPainter>, font_size: f32) -> Self {
        Self { painter, font_size }
    }

    /// Returns a captioned copy; `frame` itself is left untouched.
    pub fn apply(&self, frame: &Frame, text: &str) -> Frame {
        let mut captioned = frame.clone();
        let caption = caption_for(text.trim());
        if caption.is_empty() {
            return captioned;
        }

        let layout = self.layout(frame.width(), frame.height(), &caption);
        fill_rect_alpha(&mut captioned, layout.backdrop, BOX_COLOR, CAPTION_BOX_ALPHA);
        self.painter.draw(
            &mut captioned,
            layout.text_x,
            layout.text_y,
            &caption,
            self.font_size,
            CAPTION_COLOR,
        );
        captioned
    }

    pub fn layout(&self, width: u32, height: u32, caption: &str) -> CaptionLayout {
        let extent = self.painter.measure(caption, self.font_size);
        let pad = CAPTION_PADDING as i32;
        let text_x = (width as i32 - extent.width as i32) / 2;
        let text_y = height as i32 - CAPTION_BOTTOM_OFFSET as i32;
        CaptionLayout {
            text_x,
            text_y,
            backdrop: Rect {
                x: text_x - pad,
                y: text_y - pad,
                width: extent.width + 2 * CAPTION_PADDING,
                height: extent.height + 2 * CAPTION_PADDING,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::domain::text_painter::TextExtent;
    use std::sync::Mutex;

    /// 10 px per char, 20 px tall; records what it was asked to draw.
    struct StubPainter {
        drawn: Mutex<Vec<(i32, i32, String)>>,
    }

    impl StubPainter {
        fn new() -> Self {
            Self {
                drawn: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextPainter for StubPainter {
        fn measure(&self, text: &str, _size: f32) -> TextExtent {
            TextExtent {
                width: text.chars().count() as u32 * 10,
                height: 20,
            }
        }

        fn draw(&self, _frame: &mut Frame, x: i32, y: i32, text: &str, _size: f32, _color: [u8; 3]) {
            self.drawn.lock().unwrap().push((x, y, text.to_string()));
        }
    }

    #[test]
    fn test_layout_is_centered_above_bottom() {
        let overlay = CaptionOverlay::new(Arc::new(StubPainter::new()), 24.0);
        let layout = overlay.layout(512, 512, "hello");
        assert_eq!(layout.text_x, (512 - 50) / 2);
        assert_eq!(layout.text_y, 452);
        assert_eq!(
            layout.backdrop,
            Rect {
                x: 221,
                y: 442,
                width: 70,
                height: 40,
            }
        );
    }

    #[test]
    fn test_apply_draws_truncated_caption() {
        let painter = Arc::new(StubPainter::new());
        let overlay = CaptionOverlay::new(painter.clone(), 24.0);
        let frame = Frame::solid(512, 512, [200, 200, 200], 3);
        let text = "x".repeat(70);

        let captioned = overlay.apply(&frame, &text);

        let drawn = painter.drawn.lock().unwrap();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].2, format!("{}...", "x".repeat(50)));
        assert_eq!(captioned.index(), 3);
    }

    #[test]
    fn test_apply_darkens_backdrop_and_keeps_input() {
        let overlay = CaptionOverlay::new(Arc::new(StubPainter::new()), 24.0);
        let frame = Frame::solid(512, 512, [200, 200, 200], 0);

        let captioned = overlay.apply(&frame, "hello");

        assert_eq!(captioned.pixel(222, 443), Some([59, 59, 59]));
        assert_eq!(captioned.pixel(256, 100), Some([200, 200, 200]));
        assert_eq!(frame.pixel(222, 443), Some([200, 200, 200]));
    }

    #[test]
    fn test_blank_text_leaves_frame_unchanged() {
        let painter = Arc::new(StubPainter::new());
        let overlay = CaptionOverlay::new(painter.clone(), 24.0);
        let frame = Frame::solid(64, 64, [5, 5, 5], 0);
        assert_eq!(overlay.apply(&frame, "   "), frame);
        assert!(painter.drawn.lock().unwrap().is_empty());
    }

    #[test]
    fn test_wide_caption_is_clipped_not_panicking() {
        let overlay = CaptionOverlay::new(Arc::new(StubPainter::new()), 24.0);
        let frame = Frame::solid(64, 64, [200, 200, 200], 0);
        let captioned = overlay.apply(&frame, &"y".repeat(40));
        assert_eq!(captioned.pixel(0, 10), Some([59, 59, 59]));
    }
}
