use std::f64::consts::PI;
use std::sync::Arc;

use crate::rendering::domain::canvas::fill_circle;
use crate::rendering::domain::text_painter::TextPainter;
use crate::shared::constants::{
    FALLBACK_BACKGROUND, FALLBACK_BODY_SIZE, FALLBACK_MARKER_COLORS, FALLBACK_MARKER_RADIUS,
    FALLBACK_TITLE, FALLBACK_TITLE_SIZE, FALLBACK_WRAP_WIDTH,
};
use crate::shared::frame::Frame;
use crate::text::domain::word_wrap::wrap_words;

const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const TITLE_OFFSET: i32 = 50;
const LINE_SPACING: i32 = 30;
const MARKER_SPACING_DEG: f64 = 72.0;

/// Deterministic placeholder animation used when no frames could be
/// generated: the title and wrapped prompt on a dark background, with five
/// coloured markers orbiting the centre once over the whole clip.
pub struct FallbackAnimation {
    backdrop: Frame,
    frame_count: usize,
}

impl FallbackAnimation {
    pub fn new(
        painter: &Arc<dyn TextPainter>,
        prompt: &str,
        width: u32,
        height: u32,
        frame_count: usize,
    ) -> Self {
        let mut backdrop = Frame::solid(width, height, FALLBACK_BACKGROUND, 0);
        let mid_y = height as i32 / 2;

        draw_centered(
            painter.as_ref(),
            &mut backdrop,
            FALLBACK_TITLE,
            FALLBACK_TITLE_SIZE,
            mid_y - TITLE_OFFSET,
        );
        for (i, line) in wrap_words(prompt, FALLBACK_WRAP_WIDTH).iter().enumerate() {
            draw_centered(
                painter.as_ref(),
                &mut backdrop,
                line,
                FALLBACK_BODY_SIZE,
                mid_y + i as i32 * LINE_SPACING,
            );
        }

        Self {
            backdrop,
            frame_count,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn width(&self) -> u32 {
        self.backdrop.width()
    }

    pub fn height(&self) -> u32 {
        self.backdrop.height()
    }

    pub fn render(&self, index: usize) -> Frame {
        let mut frame = self.backdrop.clone().with_index(index);
        let centers = self.marker_centers(index);
        for (center, color) in centers.iter().zip(FALLBACK_MARKER_COLORS.iter()) {
            fill_circle(&mut frame, center.0, center.1, FALLBACK_MARKER_RADIUS, *color);
        }
        frame
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frame_count).map(move |i| self.render(i))
    }

    /// Marker `j` sits at `i / n * 360 + j * 72` degrees on a circle of
    /// radius `min(w, h) / 3`.
    pub fn marker_centers(&self, index: usize) -> [(f64, f64); 5] {
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        let radius = w.min(h) / 3.0;
        let progress = if self.frame_count == 0 {
            0.0
        } else {
            index as f64 / self.frame_count as f64
        };
        let base_deg = progress * 360.0;

        let mut centers = [(0.0, 0.0); 5];
        for (j, center) in centers.iter_mut().enumerate() {
            let angle = (base_deg + j as f64 * MARKER_SPACING_DEG) * PI / 180.0;
            *center = (w / 2.0 + radius * angle.cos(), h / 2.0 + radius * angle.sin());
        }
        centers
    }
}

fn draw_centered(painter: &dyn TextPainter, frame: &mut Frame, text: &str, size: f32, y: i32) {
    let extent = painter.measure(text, size);
    let x = (frame.width() as i32 - extent.width as i32) / 2;
    painter.draw(frame, x, y, text, size, TEXT_COLOR);
}
