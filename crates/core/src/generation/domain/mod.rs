pub mod capability_registry;
pub mod frame_prompt;
pub mod frame_source;
pub mod narration_source;
