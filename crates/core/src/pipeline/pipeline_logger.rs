use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for synthesis events.
///
/// Use cases report progress and stage timings here instead of logging
/// directly, so the CLI and the server can each decide how much to show.
pub trait PipelineLogger: Send {
    /// Report progress within a named stage (`"frames"`, `"encode"`, ...).
    fn progress(&mut self, stage: &str, current: usize, total: usize);

    /// Record how long one unit of work in a stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time value (narration length, frames kept, ...).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used by tests.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _stage: &str, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards events to the `log` crate and keeps per-stage timings for a
/// summary at the end of the run.
///
/// Progress lines are throttled to every `throttle` units per stage, plus
/// the first and last.
pub struct StdoutPipelineLogger {
    throttle: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle: usize) -> Self {
        Self {
            throttle: throttle.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Synthesis summary ({:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: {n:4}x  avg {avg_ms:8.1}ms  total {total_ms:8.0}ms  ({pct:4.1}%)",
                n = durations.len()
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let last = values.last().copied().unwrap_or(0.0);
            lines.push(format!("  {name}: {last:.1}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    fn should_report(&self, current: usize, total: usize) -> bool {
        total > 0 && (current <= 1 || current == total || current % self.throttle == 0)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(60)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, stage: &str, current: usize, total: usize) {
        if self.should_report(current, total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("{stage}: {current}/{total} ({pct:.0}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress("frames", 1, 5);
        logger.timing("frame", 5.0);
        logger.metric("narration_secs", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("frame", 2000.0);
        logger.timing("frame", 3000.0);
        logger.timing("encode", 5.0);

        let frames = logger.timings_for("frame").unwrap();
        assert_eq!(frames.len(), 2);
        assert_relative_eq!(frames[1], 3000.0);
        assert_eq!(logger.timings_for("encode").unwrap().len(), 1);
        assert!(logger.timings_for("mux").is_none());
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("narration_secs", 12.5);
        assert_eq!(logger.metrics_for("narration_secs").unwrap(), &[12.5]);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("frame", 20.0);
        logger.timing("mux", 30.0);
        logger.metric("frames_kept", 5.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Synthesis summary"));
        assert!(summary.contains("frame"));
        assert!(summary.contains("mux"));
        assert!(summary.contains("frames_kept: 5.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_throttle() {
        let logger = StdoutPipelineLogger::new(60);
        assert!(logger.should_report(1, 720));
        assert!(!logger.should_report(2, 720));
        assert!(logger.should_report(120, 720));
        assert!(logger.should_report(720, 720));
        assert!(!logger.should_report(0, 0));
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.info("hello world");
        assert_eq!(logger.messages, vec!["hello world".to_string()]);
    }
}
