pub mod file_video_library;
