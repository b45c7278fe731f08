pub mod generation;
pub mod library;
pub mod pipeline;
pub mod rendering;
pub mod shared;
pub mod text;
pub mod video;
