//! Session State Machine
//!
//! Owns the run state, the menu selection and the active [`Session`]. Input
//! events are applied first on every tick; clock-driven advancement happens
//! afterwards and only while `Running`.
//!
//! ```text
//!              Select/Start                 Pause
//!  Selecting ───────────────► Running ◄──────────────► Paused
//!   │    ▲                    │  ▲  │       Resume       │
//!   │g   │b/Esc         done  │  │  └──── Back ──────────┤
//!   ▼    │                    ▼  │Restart/Start          ▼
//!  Guide ┘                  Completed ── Back ──►   Selecting
//!
//!  any ── Quit ──► Exited
//! ```

use std::time::{Duration, Instant};

use crate::catalog::{self, TechniquePattern};
use crate::input::InputEvent;
use crate::session::{Advance, BoundaryCrossing, Session};

/// Top-level state of the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Browsing the technique menu
    Selecting,
    Running,
    Paused,
    /// Final cycle finished
    Completed,
    /// Reading about a technique
    Guide,
    /// Terminal state, the scheduler stops
    Exited,
}

impl RunState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Exited
    }
}

/// Bounds for the user-selected cycle count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleLimits {
    pub min: u32,
    pub max: u32,
}

impl CycleLimits {
    #[must_use]
    pub fn clamp(&self, cycles: i64) -> u32 {
        let clamped = cycles.clamp(i64::from(self.min), i64::from(self.max));
        u32::try_from(clamped).unwrap_or(self.min)
    }
}

impl Default for CycleLimits {
    fn default() -> Self {
        Self { min: 1, max: 99 }
    }
}

/// What an applied input event did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    pub from: RunState,
    pub to: RunState,
    /// A fresh session began (select, restart, start again)
    pub session_started: bool,
}

impl Applied {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to || self.session_started
    }
}

/// The session state machine
#[derive(Debug)]
pub struct SessionMachine {
    state: RunState,
    highlighted: usize,
    cycles_target: u32,
    limits: CycleLimits,
    session: Option<Session>,
    show_help: bool,
    audio_available: bool,
    audio_enabled: bool,
}

impl SessionMachine {
    /// Start in the menu with the first technique highlighted
    #[must_use]
    pub fn new(limits: CycleLimits, audio_available: bool) -> Self {
        let mut machine = Self {
            state: RunState::Selecting,
            highlighted: 0,
            cycles_target: 1,
            limits,
            session: None,
            show_help: false,
            audio_available,
            audio_enabled: audio_available,
        };
        machine.reset_cycles();
        machine
    }

    /// Skip the menu and start `pattern` right away
    pub fn start_immediately(
        &mut self,
        pattern: &'static TechniquePattern,
        cycles: Option<u32>,
        now: Instant,
    ) {
        self.highlighted = catalog::index_of(pattern).unwrap_or(0);
        self.cycles_target = match cycles {
            Some(n) => self.limits.clamp(i64::from(n)),
            None => self.limits.clamp(i64::from(pattern.default_cycles)),
        };
        self.begin_session(now);
    }

    /// Apply one input event
    pub fn apply(&mut self, event: InputEvent, now: Instant) -> Applied {
        let from = self.state;
        let mut session_started = false;

        match event {
            InputEvent::Quit => self.state = RunState::Exited,
            InputEvent::ToggleHelp => self.show_help = !self.show_help,
            InputEvent::ToggleAudio => {
                if self.audio_available {
                    self.audio_enabled = !self.audio_enabled;
                    tracing::debug!(enabled = self.audio_enabled, "Audio cues toggled");
                }
            }
            InputEvent::Back if self.show_help => self.show_help = false,
            _ => session_started = self.apply_to_state(event, now),
        }

        if from != self.state {
            tracing::debug!(from = ?from, to = ?self.state, event = ?event, "State transition");
        }

        Applied {
            from,
            to: self.state,
            session_started,
        }
    }

    fn apply_to_state(&mut self, event: InputEvent, now: Instant) -> bool {
        match (self.state, event) {
            (RunState::Selecting | RunState::Guide, InputEvent::Select | InputEvent::Start) => {
                self.begin_session(now);
                true
            }
            (RunState::Selecting | RunState::Guide, InputEvent::NavigateUp) => {
                self.move_highlight(-1);
                false
            }
            (RunState::Selecting | RunState::Guide, InputEvent::NavigateDown) => {
                self.move_highlight(1);
                false
            }
            (RunState::Selecting, InputEvent::AdjustCycles(delta)) => {
                self.cycles_target = self
                    .limits
                    .clamp(i64::from(self.cycles_target) + i64::from(delta));
                false
            }
            (RunState::Selecting, InputEvent::ToggleGuide) => {
                self.state = RunState::Guide;
                false
            }
            (RunState::Guide, InputEvent::Back | InputEvent::ToggleGuide) => {
                self.state = RunState::Selecting;
                false
            }
            (RunState::Running, InputEvent::Pause) => {
                self.state = RunState::Paused;
                false
            }
            (RunState::Paused, InputEvent::Resume) => {
                self.state = RunState::Running;
                false
            }
            (RunState::Running | RunState::Paused, InputEvent::Restart)
            | (RunState::Completed, InputEvent::Restart | InputEvent::Start | InputEvent::Select) => {
                if let Some(session) = self.session.as_mut() {
                    session.restart(now);
                    self.state = RunState::Running;
                    true
                } else {
                    false
                }
            }
            (RunState::Running | RunState::Paused | RunState::Completed, InputEvent::Back) => {
                self.session = None;
                self.state = RunState::Selecting;
                false
            }
            // Everything else, including AdjustCycles outside the menu, is a no-op
            _ => false,
        }
    }

    /// Advance the active session by `dt`, only while `Running`
    pub fn advance(&mut self, dt: Duration, crossings: &mut Vec<BoundaryCrossing>) -> Advance {
        if self.state != RunState::Running {
            return Advance::Continuing;
        }
        let Some(session) = self.session.as_mut() else {
            return Advance::Continuing;
        };

        let outcome = session.advance(dt, crossings);
        for crossing in crossings.iter() {
            tracing::trace!(
                from = ?crossing.from,
                to = ?crossing.to,
                cycle_completed = crossing.cycle_completed,
                "Phase boundary"
            );
        }
        if outcome == Advance::Completed {
            self.state = RunState::Completed;
        }
        outcome
    }

    fn begin_session(&mut self, now: Instant) {
        let pattern = self.highlighted_technique();
        tracing::debug!(technique = pattern.id, cycles = self.cycles_target, "Starting session");
        self.session = Some(Session::new(pattern, self.cycles_target, now));
        self.state = RunState::Running;
    }

    fn move_highlight(&mut self, step: isize) {
        let len = catalog::all().len();
        self.highlighted = (self.highlighted as isize + step).rem_euclid(len as isize) as usize;
        self.reset_cycles();
    }

    fn reset_cycles(&mut self) {
        let default = self.highlighted_technique().default_cycles;
        self.cycles_target = self.limits.clamp(i64::from(default));
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    #[must_use]
    pub fn highlighted_technique(&self) -> &'static TechniquePattern {
        let all = catalog::all();
        &all[self.highlighted.min(all.len() - 1)]
    }

    /// Cycle count the next session will run for
    #[must_use]
    pub fn cycles_target(&self) -> u32 {
        self.cycles_target
    }

    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Whether cues should currently be dispatched
    #[must_use]
    pub fn audio_enabled(&self) -> bool {
        self.audio_available && self.audio_enabled
    }
}
