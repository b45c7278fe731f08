pub mod video_library;
pub mod video_record;
