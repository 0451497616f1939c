//! Application wiring
//!
//! Builds the engine pieces from configuration and runs the frame scheduler
//! against the real keyboard, terminal and audio device.

use std::time::Instant;

use breathe_engine::{
    BreatheConfig, EngineError, FrameScheduler, MonotonicClock, SessionMachine, SessionSummary,
    TechniquePattern,
};
use rand::seq::SliceRandom;
use ratatui::backend::Backend;

use crate::audio;
use crate::keymap::KeyboardInput;
use crate::render::TerminalRenderer;

const CLOSING_LINES: &[&str] = &[
    "Carry this calm with you.",
    "Well breathed.",
    "Your nervous system thanks you.",
    "Come back whenever you need a reset.",
    "Slow breath, clear mind.",
    "That's a good place to start from.",
];

/// A configured breathing visualizer, ready to run
pub struct App {
    config: BreatheConfig,
    technique: Option<&'static TechniquePattern>,
    cycles: Option<u32>,
}

impl App {
    /// `technique` skips the menu; `cycles` overrides its default count
    #[must_use]
    pub fn new(
        config: BreatheConfig,
        technique: Option<&'static TechniquePattern>,
        cycles: Option<u32>,
    ) -> Self {
        Self {
            config,
            technique,
            cycles,
        }
    }

    /// Main event loop
    ///
    /// Returns the summary of the last session when there was one.
    pub async fn run<B: Backend>(
        &self,
        renderer: &mut TerminalRenderer<B>,
    ) -> Result<Option<SessionSummary>, EngineError> {
        let mut machine = SessionMachine::new(self.config.cycle_limits, self.config.audio_enabled);
        if let Some(technique) = self.technique {
            machine.start_immediately(technique, self.cycles, Instant::now());
        }

        let audio = audio::dispatcher(self.config.audio_enabled, self.config.volume);
        let mut scheduler = FrameScheduler::new(MonotonicClock, machine, audio, &self.config);
        let mut input = KeyboardInput::spawn();

        tracing::info!(
            fps = self.config.target_fps,
            audio = self.config.audio_enabled,
            technique = self.technique.map(|t| t.id),
            "Starting visualizer"
        );
        scheduler.run(&mut input, renderer).await
    }
}

/// Line printed after the terminal is restored
///
/// Only completed sessions get a summary.
#[must_use]
pub fn goodbye(summary: Option<&SessionSummary>) -> Option<String> {
    let summary = summary.filter(|s| s.completed)?;
    let secs = summary.active_time.as_secs();
    let closing = CLOSING_LINES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Well breathed.");
    Some(format!(
        "{}: {} {} in {}:{:02}. {closing}",
        summary.technique.name,
        summary.completed_cycles,
        if summary.completed_cycles == 1 { "cycle" } else { "cycles" },
        secs / 60,
        secs % 60,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathe_engine::catalog;
    use std::time::Duration;

    fn summary(completed: bool) -> SessionSummary {
        SessionSummary {
            technique: catalog::lookup("box").unwrap(),
            completed_cycles: 5,
            target_cycles: 5,
            active_time: Duration::from_secs(80),
            completed,
        }
    }

    #[test]
    fn test_goodbye_for_completed_session() {
        let line = goodbye(Some(&summary(true))).unwrap();
        assert!(line.starts_with("Box Breathing: 5 cycles in 1:20. "));
        assert!(CLOSING_LINES.iter().any(|c| line.ends_with(c)));
    }

    #[test]
    fn test_no_goodbye_without_completion() {
        assert!(goodbye(Some(&summary(false))).is_none());
        assert!(goodbye(None).is_none());
    }
}
