pub mod canvas;
pub mod caption_overlay;
pub mod fallback_animation;
pub mod frame_interpolator;
pub mod text_painter;
