pub mod bitmap_text_painter;
pub mod fontdue_text_painter;
pub mod painter_factory;
