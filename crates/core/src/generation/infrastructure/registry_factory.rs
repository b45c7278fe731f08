use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::generation::domain::frame_source::FrameSource;
use crate::generation::domain::narration_source::NarrationSource;
use crate::generation::infrastructure::diffusion_http_source::{
    DiffusionHttpSource, DiffusionSettings,
};
use crate::generation::infrastructure::espeak_narration_source::{
    EspeakNarrationSource, DEFAULT_ESPEAK_PROGRAM,
};
use crate::generation::infrastructure::google_tts_source::GoogleTtsNarrationSource;
use crate::generation::infrastructure::lazy_registry::LazyCapabilityRegistry;

/// Which text-to-speech backend narrates videos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrationBackend {
    Google,
    Espeak,
}

impl FromStr for NarrationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" | "gtts" => Ok(Self::Google),
            "espeak" | "espeak-ng" => Ok(Self::Espeak),
            other => Err(format!(
                "Narration backend must be 'google' or 'espeak', got '{other}'"
            )),
        }
    }
}

/// Everything needed to reach the generation backends.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    pub diffusion: DiffusionSettings,
    pub narration: NarrationBackend,
    /// Language code for Google, voice name for espeak.
    pub language: String,
    pub google_tld: String,
    pub espeak_program: String,
    pub speech_rate: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            diffusion: DiffusionSettings::default(),
            narration: NarrationBackend::Google,
            language: "en".to_string(),
            google_tld: "com".to_string(),
            espeak_program: DEFAULT_ESPEAK_PROGRAM.to_string(),
            speech_rate: 160,
            font_path: None,
        }
    }
}

/// Registry whose loaders connect to the configured backends on first use.
pub fn build_registry(settings: &ProviderSettings) -> LazyCapabilityRegistry {
    let diffusion = settings.diffusion.clone();
    let narration = settings.clone();

    LazyCapabilityRegistry::new(
        Box::new(move || {
            let source = DiffusionHttpSource::connect(diffusion.clone())?;
            Ok(Arc::new(source) as Arc<dyn FrameSource>)
        }),
        Box::new(move || create_narration_source(&narration)),
    )
}

fn create_narration_source(
    settings: &ProviderSettings,
) -> Result<Arc<dyn NarrationSource>, Box<dyn std::error::Error>> {
    match settings.narration {
        NarrationBackend::Google => {
            log::info!("Using Google speech for narration ({})", settings.language);
            Ok(Arc::new(GoogleTtsNarrationSource::new(
                &settings.language,
                &settings.google_tld,
            )?))
        }
        NarrationBackend::Espeak => {
            log::info!("Using {} for narration", settings.espeak_program);
            Ok(Arc::new(EspeakNarrationSource::locate(
                &settings.espeak_program,
                &settings.language,
                settings.speech_rate,
            )?))
        }
    }
}
