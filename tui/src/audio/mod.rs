//! Audio output
//!
//! The engine hands cues to a worker thread; this module supplies the
//! backend that worker runs. The rodio output stream is not `Send`, so it
//! is opened inside the worker by the factory passed to
//! [`CueDispatcher::spawn`].

pub mod tone;

use breathe_engine::CueDispatcher;

pub use tone::{Chime, Tone};

/// Build the cue dispatcher for this process
///
/// Disabled configuration or a build without the `audio` feature gives a
/// dispatcher that never sends.
#[must_use]
pub fn dispatcher(enabled: bool, volume: f32) -> CueDispatcher {
    if !enabled {
        tracing::debug!("Audio disabled by configuration");
        return CueDispatcher::disabled();
    }
    spawn_backend(volume)
}

#[cfg(feature = "audio")]
fn spawn_backend(volume: f32) -> CueDispatcher {
    CueDispatcher::spawn(move || rodio_backend::RodioBackend::try_new(volume))
}

#[cfg(not(feature = "audio"))]
fn spawn_backend(_volume: f32) -> CueDispatcher {
    tracing::debug!("Built without audio support");
    CueDispatcher::disabled()
}

#[cfg(feature = "audio")]
mod rodio_backend {
    use breathe_engine::{AudioBackend, AudioBackendError, Cue};
    use rodio::{OutputStream, Sink};

    use super::tone::{Chime, Tone};

    /// Plays chimes on the default output device
    pub struct RodioBackend {
        _stream: OutputStream,
        sink: Sink,
        volume: f32,
    }

    impl RodioBackend {
        pub fn try_new(volume: f32) -> Result<Self, AudioBackendError> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| AudioBackendError::Unavailable(e.to_string()))?;
            let sink =
                Sink::try_new(&handle).map_err(|e| AudioBackendError::Unavailable(e.to_string()))?;
            tracing::debug!(volume, "Audio output ready");
            Ok(Self {
                _stream: stream,
                sink,
                volume,
            })
        }
    }

    impl AudioBackend for RodioBackend {
        fn play(&mut self, cue: Cue) -> Result<(), AudioBackendError> {
            // A new cue cuts off whatever is still ringing
            if !self.sink.empty() {
                self.sink.clear();
                self.sink.play();
            }
            self.sink.append(Chime::new(Tone::for_cue(cue), self.volume));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_dispatcher_when_configured_off() {
        assert!(!dispatcher(false, 0.5).is_enabled());
    }
}
