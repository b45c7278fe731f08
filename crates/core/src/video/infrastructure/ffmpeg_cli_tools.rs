use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::shared::constants::{AUDIO_BITRATE, VIDEO_CRF, VIDEO_PRESET};
use crate::video::domain::media_tools::{AudioLooper, Muxer};

pub const DEFAULT_FFMPEG_PROGRAM: &str = "ffmpeg";

/// Audio looping and final muxing through the `ffmpeg` executable.
///
/// Stream looping and mixed-input muxing with re-encoding are one-liners on
/// the command line, so these run as subprocesses while frame encoding stays
/// in-process.
#[derive(Clone, Debug)]
pub struct FfmpegCli {
    program: String,
}

impl FfmpegCli {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_FFMPEG_PROGRAM)
    }

    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// True if the executable can be launched.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(&self, args: Vec<OsString>) -> Result<(), Box<dyn std::error::Error>> {
        log::debug!("{} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to launch {}: {e}", self.program))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();
        Err(format!("{} exited with {}: {}", self.program, output.status, tail.join(" | ")).into())
    }
}

impl Default for FfmpegCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioLooper for FfmpegCli {
    fn loop_audio(
        &self,
        input: &Path,
        plays: u32,
        output: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if plays == 0 {
            return Err("audio must be played at least once".into());
        }
        self.run(loop_args(input, plays, output))
    }
}

impl Muxer for FfmpegCli {
    fn mux(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
        duration_secs: f64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run(mux_args(video, audio, output, duration_secs))?;
        if !output.exists() {
            return Err(format!("{} wrote no output", self.program).into());
        }
        Ok(())
    }
}

/// `-stream_loop N` repeats the input N extra times.
fn loop_args(input: &Path, plays: u32, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-stream_loop".into(),
        (plays - 1).to_string().into(),
        "-i".into(),
        input.as_os_str().to_owned(),
        "-vn".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        AUDIO_BITRATE.into(),
        output.as_os_str().to_owned(),
    ]
}

fn mux_args(video: &Path, audio: &Path, output: &Path, duration_secs: f64) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-i".into(),
        video.as_os_str().to_owned(),
        "-i".into(),
        audio.as_os_str().to_owned(),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        VIDEO_PRESET.into(),
        "-crf".into(),
        VIDEO_CRF.to_string().into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        AUDIO_BITRATE.into(),
        "-t".into(),
        format_seconds(duration_secs).into(),
        "-movflags".into(),
        "+faststart".into(),
        output.as_os_str().to_owned(),
    ]
}

fn format_seconds(secs: f64) -> String {
    let formatted = format!("{secs:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::media_probe::MediaProbe;
    use crate::video::infrastructure::ffmpeg_probe::FfmpegProbe;
    use rstest::rstest;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn window(args: &[String], flag: &str) -> String {
        let pos = args.iter().position(|a| a == flag).unwrap();
        args[pos + 1].clone()
    }

    #[test]
    fn test_loop_args_repeat_extra_times() {
        let args = strings(loop_args(Path::new("in.mp3"), 4, Path::new("out.m4a")));
        assert_eq!(window(&args, "-stream_loop"), "3");
        assert_eq!(window(&args, "-i"), "in.mp3");
        assert_eq!(args.last().unwrap(), "out.m4a");
    }

    #[test]
    fn test_mux_args_use_output_quality_settings() {
        let args = strings(mux_args(
            Path::new("silent.mp4"),
            Path::new("voice.m4a"),
            Path::new("final.mp4"),
            30.0,
        ));
        assert_eq!(window(&args, "-crf"), "23");
        assert_eq!(window(&args, "-preset"), "medium");
        assert_eq!(window(&args, "-b:a"), "192k");
        assert_eq!(window(&args, "-t"), "30");
        assert_eq!(window(&args, "-c:v"), "libx264");
        assert_eq!(args.last().unwrap(), "final.mp4");
    }

    #[rstest]
    #[case(30.0, "30")]
    #[case(2.5, "2.5")]
    #[case(0.125, "0.125")]
    fn test_format_seconds(#[case] secs: f64, #[case] expected: &str) {
        assert_eq!(format_seconds(secs), expected);
    }

    #[test]
    fn test_zero_plays_rejected() {
        let cli = FfmpegCli::new();
        assert!(cli
            .loop_audio(Path::new("a.mp3"), 0, Path::new("b.m4a"))
            .is_err());
    }

    #[test]
    fn test_missing_program_reports_launch_failure() {
        let cli = FfmpegCli::with_program("definitely-not-ffmpeg");
        assert!(!cli.is_available());
        let err = cli
            .mux(Path::new("a.mp4"), Path::new("b.m4a"), Path::new("c.mp4"), 30.0)
            .unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }

    #[test]
    fn test_loop_extends_short_audio() {
        let cli = FfmpegCli::new();
        if !cli.is_available() {
            return;
        }
        let tmp = tempfile::tempdir().unwrap();
        let tone = tmp.path().join("tone.wav");
        let status = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error", "-f", "lavfi", "-i", "sine=frequency=440:duration=2"])
            .arg(&tone)
            .status()
            .unwrap();
        assert!(status.success());

        let looped = tmp.path().join("looped.m4a");
        cli.loop_audio(&tone, 3, &looped).unwrap();

        let duration = FfmpegProbe::new().duration_secs(&looped).unwrap();
        assert!(duration >= 5.8, "looped duration was {duration}");
    }
}
