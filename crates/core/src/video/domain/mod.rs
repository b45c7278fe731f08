pub mod media_probe;
pub mod media_tools;
pub mod video_writer;
