pub mod ffmpeg_cli_tools;
pub mod ffmpeg_probe;
pub mod ffmpeg_writer;
