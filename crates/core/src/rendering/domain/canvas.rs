//! Pixel-level drawing primitives on RGB frames. All operations clip to
//! the frame bounds.

use crate::shared::frame::Frame;

/// Axis-aligned rectangle in frame coordinates; may extend past the edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Blends `color` over the pixel at `(x, y)` with `coverage` in `0.0..=1.0`.
pub fn blend_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= frame.width() || y as u32 >= frame.height() {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }
    let channels = frame.channels() as usize;
    let offset = ((y as usize) * (frame.width() as usize) + x as usize) * channels;
    let pixel = &mut frame.data_mut()[offset..offset + 3];
    for (dst, &src) in pixel.iter_mut().zip(color.iter()) {
        let blended = f32::from(src) * coverage + f32::from(*dst) * (1.0 - coverage);
        *dst = blended.round().clamp(0.0, 255.0) as u8;
    }
}

/// Fills `rect` with `color` at opacity `alpha / 255`.
pub fn fill_rect_alpha(frame: &mut Frame, rect: Rect, color: [u8; 3], alpha: u8) {
    let Some((x0, y0, x1, y1)) = clip(frame, rect) else {
        return;
    };
    let a = u32::from(alpha);
    let width = frame.width() as usize;
    let channels = frame.channels() as usize;
    let data = frame.data_mut();
    for y in y0..y1 {
        let row = y * width;
        for x in x0..x1 {
            let offset = (row + x) * channels;
            for (c, &src) in color.iter().enumerate() {
                let dst = u32::from(data[offset + c]);
                data[offset + c] = ((u32::from(src) * a + dst * (255 - a) + 127) / 255) as u8;
            }
        }
    }
}

/// Fills a disc of `radius` pixels centred on `(cx, cy)`.
pub fn fill_circle(frame: &mut Frame, cx: f64, cy: f64, radius: u32, color: [u8; 3]) {
    let r = f64::from(radius);
    let bounds = Rect {
        x: (cx - r).floor() as i32,
        y: (cy - r).floor() as i32,
        width: radius * 2 + 2,
        height: radius * 2 + 2,
    };
    let Some((x0, y0, x1, y1)) = clip(frame, bounds) else {
        return;
    };
    let width = frame.width() as usize;
    let channels = frame.channels() as usize;
    let data = frame.data_mut();
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                let offset = (y * width + x) * channels;
                data[offset..offset + 3].copy_from_slice(&color);
            }
        }
    }
}

fn clip(frame: &Frame, rect: Rect) -> Option<(usize, usize, usize, usize)> {
    let x0 = rect.x.max(0) as i64;
    let y0 = rect.y.max(0) as i64;
    let x1 = (i64::from(rect.x) + i64::from(rect.width)).min(i64::from(frame.width()));
    let y1 = (i64::from(rect.y) + i64::from(rect.height)).min(i64::from(frame.height()));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_alpha_darkens_inside_only() {
        let mut frame = Frame::solid(10, 10, [200, 200, 200], 0);
        let rect = Rect {
            x: 2,
            y: 2,
            width: 3,
            height: 3,
        };
        fill_rect_alpha(&mut frame, rect, [0, 0, 0], 180);

        // 200 * 75 / 255 rounds to 59
        assert_eq!(frame.pixel(2, 2), Some([59, 59, 59]));
        assert_eq!(frame.pixel(4, 4), Some([59, 59, 59]));
        assert_eq!(frame.pixel(5, 5), Some([200, 200, 200]));
        assert_eq!(frame.pixel(1, 2), Some([200, 200, 200]));
    }

    #[test]
    fn test_fill_rect_alpha_full_opacity_replaces() {
        let mut frame = Frame::solid(4, 4, [10, 20, 30], 0);
        let rect = Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        };
        fill_rect_alpha(&mut frame, rect, [255, 0, 0], 255);
        assert_eq!(frame.pixel(3, 3), Some([255, 0, 0]));
    }

    #[test]
    fn test_fill_rect_clips_to_frame() {
        let mut frame = Frame::solid(4, 4, [100, 100, 100], 0);
        let rect = Rect {
            x: -10,
            y: 2,
            width: 100,
            height: 100,
        };
        fill_rect_alpha(&mut frame, rect, [0, 0, 0], 255);
        assert_eq!(frame.pixel(0, 1), Some([100, 100, 100]));
        assert_eq!(frame.pixel(3, 3), Some([0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_outside_frame_is_noop() {
        let mut frame = Frame::solid(4, 4, [100, 100, 100], 0);
        let before = frame.clone();
        let rect = Rect {
            x: 10,
            y: 10,
            width: 3,
            height: 3,
        };
        fill_rect_alpha(&mut frame, rect, [0, 0, 0], 255);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_fill_circle_covers_center_not_corners() {
        let mut frame = Frame::black(40, 40, 0);
        fill_circle(&mut frame, 20.0, 20.0, 5, [255, 200, 0]);
        assert_eq!(frame.pixel(20, 20), Some([255, 200, 0]));
        assert_eq!(frame.pixel(23, 20), Some([255, 200, 0]));
        assert_eq!(frame.pixel(15, 15), Some([0, 0, 0]));
        assert_eq!(frame.pixel(30, 20), Some([0, 0, 0]));
    }

    #[test]
    fn test_fill_circle_partially_outside() {
        let mut frame = Frame::black(10, 10, 0);
        fill_circle(&mut frame, 0.0, 0.0, 3, [1, 2, 3]);
        assert_eq!(frame.pixel(0, 0), Some([1, 2, 3]));
    }

    #[test]
    fn test_blend_pixel_half_coverage() {
        let mut frame = Frame::black(2, 2, 0);
        blend_pixel(&mut frame, 1, 1, [255, 255, 255], 0.5);
        assert_eq!(frame.pixel(1, 1), Some([128, 128, 128]));
        blend_pixel(&mut frame, -1, 0, [255, 255, 255], 1.0);
        blend_pixel(&mut frame, 2, 0, [255, 255, 255], 1.0);
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
    }
}
