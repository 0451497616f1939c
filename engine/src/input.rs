//! Input contract
//!
//! Surfaces translate their raw key events into [`InputEvent`]s and hand them
//! to the scheduler through [`InputSource`]. Polling never blocks.

use crate::machine::RunState;

/// A user command, consumed once by the session state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Start,
    Pause,
    Resume,
    Restart,
    Quit,
    Back,
    NavigateUp,
    NavigateDown,
    Select,
    /// Change the target cycle count by a signed amount (menu only)
    AdjustCycles(i32),
    ToggleHelp,
    ToggleGuide,
    /// Mute or unmute audio cues for the rest of the process
    ToggleAudio,
}

/// Non-blocking source of input events
pub trait InputSource {
    /// Return at most one pending event
    ///
    /// `state` lets the source resolve context-dependent keys (one key for
    /// start, pause and resume). Must return immediately when nothing is
    /// pending.
    fn poll(&mut self, state: RunState) -> Option<InputEvent>;
}

/// Replays a fixed list of events, one per poll
///
/// `None` entries are ticks where no key was pressed.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    events: std::collections::VecDeque<Option<InputEvent>>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = Option<InputEvent>>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Nothing left to replay
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: RunState) -> Option<InputEvent> {
        self.events.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_replays_in_order() {
        let mut input = ScriptedInput::new([Some(InputEvent::Select), None, Some(InputEvent::Quit)]);
        assert_eq!(input.poll(RunState::Selecting), Some(InputEvent::Select));
        assert_eq!(input.poll(RunState::Running), None);
        assert_eq!(input.poll(RunState::Running), Some(InputEvent::Quit));
        assert!(input.is_exhausted());
        assert_eq!(input.poll(RunState::Running), None);
    }
}
