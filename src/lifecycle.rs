//! Advisory phase timing for the page pipeline.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Pipeline phases measured per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Active user resolution.
    UserResolution,
    /// Primary data fetch.
    DataFetch,
    /// Locale variable resolution.
    LocaleResolution,
    /// Page template variable build.
    TemplateVars,
    /// Head/content/footer rendering.
    Render,
}

impl Phase {
    /// Phase name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserResolution => "user_resolution",
            Self::DataFetch => "data_fetch",
            Self::LocaleResolution => "locale_resolution",
            Self::TemplateVars => "template_vars",
            Self::Render => "render",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timing markers collected while a request moves through the pipeline.
///
/// Advisory instrumentation only; never consulted for control flow.
#[derive(Debug, Clone)]
pub struct Timings {
    start: Instant,
    open: HashMap<Phase, Instant>,
    durations: HashMap<Phase, Duration>,
}

impl Timings {
    /// Start timing a new request.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            open: HashMap::new(),
            durations: HashMap::new(),
        }
    }

    /// Mark the start of a phase.
    pub fn begin(&mut self, phase: Phase) {
        self.open.insert(phase, Instant::now());
    }

    /// Mark the end of a phase, recording its duration.
    ///
    /// Ending a phase that was never begun records nothing.
    pub fn end(&mut self, phase: Phase) {
        if let Some(begun) = self.open.remove(&phase) {
            self.durations.insert(phase, begun.elapsed());
        }
    }

    /// Duration of a completed phase.
    pub fn phase_duration(&self, phase: Phase) -> Option<Duration> {
        self.durations.get(&phase).copied()
    }

    /// Total elapsed time since the request started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_roundtrip() {
        let mut timings = Timings::new();
        timings.begin(Phase::DataFetch);
        timings.end(Phase::DataFetch);
        assert!(timings.phase_duration(Phase::DataFetch).is_some());
        assert!(timings.phase_duration(Phase::Render).is_none());
    }

    #[test]
    fn test_end_without_begin_records_nothing() {
        let mut timings = Timings::new();
        timings.end(Phase::Render);
        assert!(timings.phase_duration(Phase::Render).is_none());
    }
}
