pub mod diffusion_http_source;
pub mod espeak_narration_source;
pub mod google_tts_source;
pub mod lazy_registry;
pub mod registry_factory;
