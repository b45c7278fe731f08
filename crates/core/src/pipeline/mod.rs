pub mod audio_normalizer;
pub mod create_video_use_case;
pub mod fallback_video_use_case;
pub mod frame_generation;
pub mod generation_budget;
pub mod infrastructure;
pub mod mux_stage;
pub mod pipeline_logger;
pub mod request_workspace;
pub mod silent_render;
pub mod soundtrack;
pub mod stage;
pub mod synthesize_video_use_case;
