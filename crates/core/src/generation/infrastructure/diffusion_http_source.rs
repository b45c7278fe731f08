use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::generation::domain::frame_prompt::FramePrompt;
use crate::generation::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

pub const DEFAULT_DIFFUSION_URL: &str = "http://127.0.0.1:7860";
pub const DEFAULT_STEPS: u32 = 30;
pub const DEFAULT_GUIDANCE: f32 = 7.5;
pub const DEFAULT_SAMPLER: &str = "DPM++ 2M";

/// Connection settings for a Stable Diffusion WebUI compatible server.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffusionSettings {
    pub base_url: String,
    /// Checkpoint to activate on load; the server's current one when `None`.
    pub checkpoint: Option<String>,
    pub steps: u32,
    pub guidance: f32,
    pub sampler: String,
    pub request_timeout: Duration,
}

impl Default for DiffusionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIFFUSION_URL.to_string(),
            checkpoint: None,
            steps: DEFAULT_STEPS,
            guidance: DEFAULT_GUIDANCE,
            sampler: DEFAULT_SAMPLER.to_string(),
            request_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Serialize)]
struct Txt2ImgRequest<'a> {
    prompt: &'a str,
    negative_prompt: &'a str,
    seed: u64,
    steps: u32,
    cfg_scale: f32,
    width: u32,
    height: u32,
    sampler_name: &'a str,
    batch_size: u32,
    n_iter: u32,
}

#[derive(Deserialize)]
struct Txt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Serialize)]
struct OptionsRequest<'a> {
    sd_model_checkpoint: &'a str,
}

/// Frame source backed by the `/sdapi/v1/txt2img` HTTP endpoint.
pub struct DiffusionHttpSource {
    client: reqwest::blocking::Client,
    settings: DiffusionSettings,
}

impl DiffusionHttpSource {
    /// Connects to the server and activates the configured checkpoint.
    ///
    /// This is the expensive step (the server loads model weights), which is
    /// why the registry calls it once and keeps the handle.
    pub fn connect(settings: DiffusionSettings) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let source = Self { client, settings };

        match source.settings.checkpoint.as_deref() {
            Some(checkpoint) => {
                log::info!("Activating diffusion checkpoint {checkpoint}");
                source
                    .client
                    .post(source.endpoint("options"))
                    .json(&OptionsRequest {
                        sd_model_checkpoint: checkpoint,
                    })
                    .send()?
                    .error_for_status()?;
            }
            None => {
                source
                    .client
                    .get(source.endpoint("sd-models"))
                    .send()?
                    .error_for_status()?;
            }
        }
        log::info!("Diffusion server ready at {}", source.settings.base_url);
        Ok(source)
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/sdapi/v1/{name}", self.settings.base_url.trim_end_matches('/'))
    }
}

impl FrameSource for DiffusionHttpSource {
    fn generate(&self, prompt: &FramePrompt) -> Result<Frame, Box<dyn std::error::Error>> {
        let body = Txt2ImgRequest {
            prompt: &prompt.prompt,
            negative_prompt: &prompt.negative_prompt,
            seed: prompt.seed,
            steps: self.settings.steps,
            cfg_scale: self.settings.guidance,
            width: prompt.width,
            height: prompt.height,
            sampler_name: &self.settings.sampler,
            batch_size: 1,
            n_iter: 1,
        };
        let response: Txt2ImgResponse = self
            .client
            .post(self.endpoint("txt2img"))
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        let payload = response
            .images
            .first()
            .ok_or("diffusion server returned no images")?;
        decode_image_payload(payload)
    }
}

/// Decodes a base64 image (optionally a `data:` URI) into an RGB frame.
pub fn decode_image_payload(payload: &str) -> Result<Frame, Box<dyn std::error::Error>> {
    let encoded = match payload.split_once(";base64,") {
        Some((_, data)) => data,
        None => payload,
    };
    let bytes = STANDARD.decode(encoded.trim())?;
    let rgb = image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height, 3, 0))
}
