use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings};

use crate::rendering::domain::canvas::blend_pixel;
use crate::rendering::domain::text_painter::{TextExtent, TextPainter};
use crate::shared::frame::Frame;

/// Anti-aliased text rendering from a TrueType/OpenType font.
pub struct FontdueTextPainter {
    font: Font,
}

impl FontdueTextPainter {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes)
            .map_err(|e| format!("failed to load font {}: {e}", path.display()).into())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let font = Font::from_bytes(bytes, FontSettings::default())?;
        Ok(Self { font })
    }

    fn ascent_descent(&self, size: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(size) {
            Some(metrics) => (metrics.ascent, metrics.descent),
            None => (size * 0.8, -size * 0.2),
        }
    }
}

impl TextPainter for FontdueTextPainter {
    fn measure(&self, text: &str, size: f32) -> TextExtent {
        let width: f32 = text
            .chars()
            .map(|c| self.font.metrics(c, size).advance_width)
            .sum();
        let (ascent, descent) = self.ascent_descent(size);
        TextExtent {
            width: width.ceil().max(0.0) as u32,
            height: (ascent - descent).ceil().max(0.0) as u32,
        }
    }

    fn draw(&self, frame: &mut Frame, x: i32, y: i32, text: &str, size: f32, color: [u8; 3]) {
        let (ascent, _) = self.ascent_descent(size);
        let baseline = y as f32 + ascent;
        let mut pen_x = x as f32;

        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, size);
            let left = pen_x.round() as i32 + metrics.xmin;
            let top = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    blend_pixel(
                        frame,
                        left + col as i32,
                        top + row as i32,
                        color,
                        f32::from(alpha) / 255.0,
                    );
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}
