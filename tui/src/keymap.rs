//! Keyboard Input Handler
//!
//! A background task reads crossterm's [`EventStream`] and forwards key
//! presses over a small bounded channel. The scheduler polls the receiving
//! end with `try_recv`, so a quiet keyboard never delays a frame. When the
//! queue is full, further presses are dropped, which collapses a held key's
//! auto-repeat into what the scheduler can actually consume.
//!
//! Keys are translated at poll time because Space means different things
//! depending on the run state.

use breathe_engine::{InputEvent, InputSource, RunState};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Translate a key press into an input event for the given state
///
/// Returns `None` for keys with no binding.
#[must_use]
pub fn translate(key: KeyEvent, state: RunState) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let event = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Char(' ') => match state {
            RunState::Running => InputEvent::Pause,
            RunState::Paused => InputEvent::Resume,
            _ => InputEvent::Start,
        },
        KeyCode::Enter => InputEvent::Select,
        KeyCode::Up | KeyCode::Char('k') => InputEvent::NavigateUp,
        KeyCode::Down | KeyCode::Char('j') => InputEvent::NavigateDown,
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => InputEvent::AdjustCycles(1),
        KeyCode::Left | KeyCode::Char('-') => InputEvent::AdjustCycles(-1),
        KeyCode::Char('g') => InputEvent::ToggleGuide,
        KeyCode::Char('r') => InputEvent::Restart,
        KeyCode::Char('b') | KeyCode::Esc => InputEvent::Back,
        KeyCode::Char('?') => InputEvent::ToggleHelp,
        KeyCode::Char('a') => InputEvent::ToggleAudio,
        KeyCode::Char('q') => InputEvent::Quit,
        _ => return None,
    };
    Some(event)
}

/// Key bindings shown in the help overlay
pub const BINDINGS: &[(&str, &str)] = &[
    ("Space", "Start / pause / resume"),
    ("Enter", "Select technique"),
    ("↑ ↓", "Choose technique"),
    ("← →", "Fewer / more cycles"),
    ("g", "Technique guide"),
    ("r", "Restart session"),
    ("a", "Toggle sound"),
    ("b Esc", "Back"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

/// Key presses buffered between two scheduler polls
pub const KEY_QUEUE_CAPACITY: usize = 16;

/// Queue a key for the scheduler
///
/// Returns `false` once the receiving side is gone.
fn forward(tx: &mpsc::Sender<KeyEvent>, key: KeyEvent) -> bool {
    match tx.try_send(key) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(key)) => {
            tracing::trace!(code = ?key.code, "Key queue full, dropping press");
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

/// Keyboard input source fed by a background reader task
pub struct KeyboardInput {
    rx: mpsc::Receiver<KeyEvent>,
    reader: Option<JoinHandle<()>>,
}

impl KeyboardInput {
    /// Spawn the reader task on the current tokio runtime
    #[must_use]
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(KEY_QUEUE_CAPACITY);
        let reader = tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(event) = events.next().await {
                match event {
                    Ok(Event::Key(key)) => {
                        if !forward(&tx, key) {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Terminal event stream failed");
                        break;
                    }
                }
            }
        });
        Self {
            rx,
            reader: Some(reader),
        }
    }

    /// Input source backed by a caller-owned sender
    #[must_use]
    pub fn from_channel(rx: mpsc::Receiver<KeyEvent>) -> Self {
        Self { rx, reader: None }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self, state: RunState) -> Option<InputEvent> {
        // Unbound keys are dropped so they can't starve the next real one
        while let Ok(key) = self.rx.try_recv() {
            if let Some(event) = translate(key, state) {
                return Some(event);
            }
        }
        None
    }
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
