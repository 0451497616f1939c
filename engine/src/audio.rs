//! Audio Cue Dispatcher
//!
//! A one-way handoff from the tick loop to an audio worker. The tick loop
//! only ever calls `try_send` on a bounded channel: a full queue drops the
//! cue, a dead worker disables dispatch, and neither case reaches the
//! session state machine.
//!
//! Backends are built inside the worker thread by a factory closure, so
//! backends holding non-`Send` device handles work fine.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;

use thiserror::Error;

use crate::catalog::PhaseLabel;

/// Cues queued before new ones are dropped
pub const CUE_QUEUE_CAPACITY: usize = 8;

/// A sound trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// A session began (or began again)
    Start,
    /// A phase boundary was crossed
    Phase { from: PhaseLabel, to: PhaseLabel },
    /// The final boundary of the session was crossed
    Complete,
}

/// Failures inside an audio backend; never leave the worker
#[derive(Debug, Error)]
pub enum AudioBackendError {
    /// No usable output device
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    /// Device present but playback failed
    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// Something that can make a sound for a cue
pub trait AudioBackend {
    /// Play `cue`. May block; it runs on the audio worker.
    fn play(&mut self, cue: Cue) -> Result<(), AudioBackendError>;
}

/// Fire-and-forget cue sender owned by the tick loop
#[derive(Debug)]
pub struct CueDispatcher {
    tx: Option<SyncSender<Cue>>,
    enabled: bool,
    dropped: u64,
}

impl CueDispatcher {
    /// Dispatcher that never sends anything
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            tx: None,
            enabled: false,
            dropped: 0,
        }
    }

    /// Dispatcher feeding a caller-owned receiver
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, Receiver<Cue>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        let dispatcher = Self {
            tx: Some(tx),
            enabled: true,
            dropped: 0,
        };
        (dispatcher, rx)
    }

    /// Spawn a detached audio worker running the backend `factory` builds
    ///
    /// If the factory fails the worker keeps draining cues silently. If the
    /// thread can't be spawned the dispatcher comes back disabled.
    pub fn spawn<F, B>(factory: F) -> Self
    where
        F: FnOnce() -> Result<B, AudioBackendError> + Send + 'static,
        B: AudioBackend,
    {
        let (dispatcher, rx) = Self::channel(CUE_QUEUE_CAPACITY);

        let spawned = thread::Builder::new()
            .name("breathe-audio".to_string())
            .spawn(move || run_worker(factory, rx));

        match spawned {
            Ok(_detached) => dispatcher,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to spawn audio worker, audio disabled");
                Self::disabled()
            }
        }
    }

    /// Enable or mute dispatch. No effect on a disabled dispatcher.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.tx.is_some();
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cues dropped because the worker was behind
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn on_phase_boundary(&mut self, from: PhaseLabel, to: PhaseLabel) {
        self.send(Cue::Phase { from, to });
    }

    pub fn on_session_start(&mut self) {
        self.send(Cue::Start);
    }

    pub fn on_session_complete(&mut self) {
        self.send(Cue::Complete);
    }

    fn send(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let Some(tx) = self.tx.as_ref() else {
            return;
        };

        match tx.try_send(cue) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                tracing::trace!(cue = ?cue, "Audio queue full, cue dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("Audio worker gone, disabling cues");
                self.tx = None;
                self.enabled = false;
            }
        }
    }
}

fn run_worker<F, B>(factory: F, rx: Receiver<Cue>)
where
    F: FnOnce() -> Result<B, AudioBackendError>,
    B: AudioBackend,
{
    let mut backend = match factory() {
        Ok(backend) => backend,
        Err(e) => {
            tracing::warn!(error = %e, "Audio backend unavailable, continuing without sound");
            for _ in rx {}
            return;
        }
    };

    for cue in rx {
        if let Err(e) = backend.play(cue) {
            tracing::debug!(error = %e, cue = ?cue, "Audio cue failed");
        }
    }
}
