use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::generation::domain::narration_source::NarrationSource;

pub const DEFAULT_ESPEAK_PROGRAM: &str = "espeak-ng";

/// Offline narration through the `espeak-ng` command line tool.
pub struct EspeakNarrationSource {
    program: String,
    voice: String,
    words_per_minute: u32,
}

impl EspeakNarrationSource {
    /// Checks that the program can be run before handing out the source.
    pub fn locate(
        program: &str,
        voice: &str,
        words_per_minute: u32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let status = Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("{program} not runnable: {e}"))?;
        if !status.success() {
            return Err(format!("{program} --version exited with {status}").into());
        }
        Ok(Self {
            program: program.to_string(),
            voice: voice.to_string(),
            words_per_minute,
        })
    }

    fn command_args(&self, text: &str, output: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            self.voice.clone().into(),
            "-s".into(),
            self.words_per_minute.to_string().into(),
            "-w".into(),
            output.as_os_str().to_owned(),
            "--".into(),
            text.into(),
        ]
    }
}

impl NarrationSource for EspeakNarrationSource {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if text.trim().is_empty() {
            return Err("nothing to narrate".into());
        }
        let result = Command::new(&self.program)
            .args(self.command_args(text, output))
            .stdout(Stdio::null())
            .output()?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(format!("{} failed: {}", self.program, stderr.trim()).into());
        }
        if !output.exists() {
            return Err(format!("{} produced no audio", self.program).into());
        }
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "wav"
    }
}
