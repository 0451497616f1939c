//! Breathe Engine - Headless Breathing Session Engine
//!
//! Everything needed to play a breathing technique in real time, with no
//! knowledge of terminals, colors or sound devices. A surface supplies an
//! [`InputSource`], a [`FrameRenderer`] and optionally an [`AudioBackend`];
//! the engine supplies the timing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Surface (TUI)                            │
//! │   keys ──► InputSource              FrameRenderer ◄── RenderFrame│
//! │                                     AudioBackend  ◄── Cue        │
//! └──────────────┬──────────────────────────▲──────────────▲─────────┘
//!                │ InputEvent               │              │ (worker thread)
//! ┌──────────────┼──────────────────────────┼──────────────┼─────────┐
//! │              ▼          BREATHE ENGINE  │              │         │
//! │  ┌──────────────────────────────────────┴──┐   ┌──────┴───────┐ │
//! │  │              FrameScheduler             ├──►│CueDispatcher │ │
//! │  └───┬─────────────┬──────────────┬────────┘   └──────────────┘ │
//! │      ▼             ▼              ▼                              │
//! │  ┌────────┐  ┌────────────┐  ┌───────────────┐                   │
//! │  │ Clock  │  │  Session   │  │ Animation     │                   │
//! │  │        │  │  Machine   │  │ Engine        │                   │
//! │  └────────┘  └─────┬──────┘  └───────────────┘                   │
//! │                    ▼                                             │
//! │              ┌──────────┐                                        │
//! │              │ Catalog  │  (static, read-only)                   │
//! │              └──────────┘                                        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`FrameScheduler`]: the fixed-cadence loop tying everything together
//! - [`SessionMachine`]: run state, menu selection and the active session
//! - [`Session`]: phase index, elapsed time and cycle count for one playthrough
//! - [`AnimationEngine`]: amplitude curve and particle snapshots
//! - [`CueDispatcher`]: one-way, non-blocking handoff to the audio worker
//!
//! # Quick Start
//!
//! ```ignore
//! use breathe_engine::{
//!     catalog, BreatheConfig, CueDispatcher, FrameScheduler, MonotonicClock, SessionMachine,
//! };
//!
//! let config = BreatheConfig::default();
//! let mut machine = SessionMachine::new(config.cycle_limits, false);
//! machine.start_immediately(catalog::lookup("box")?, None, std::time::Instant::now());
//!
//! let mut scheduler =
//!     FrameScheduler::new(MonotonicClock, machine, CueDispatcher::disabled(), &config);
//! let summary = scheduler.run(&mut my_input, &mut my_renderer).await?;
//! ```

pub mod animation;
pub mod audio;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod machine;
pub mod scheduler;
pub mod session;

pub use animation::{AnimationCurve, AnimationEngine, AnimationFrame, EasingFunction, Particle};
pub use audio::{AudioBackend, AudioBackendError, Cue, CueDispatcher};
pub use catalog::{CatalogError, PhaseLabel, PhaseSpec, TechniquePattern};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{BreatheConfig, ConfigError, ConfigOverrides, ConfigSource};
pub use error::{ConfigurationError, EngineError};
pub use input::{InputEvent, InputSource};
pub use machine::{CycleLimits, RunState, SessionMachine};
pub use scheduler::{FrameRenderer, FrameScheduler, RenderFrame, SessionSummary};
pub use session::{BoundaryCrossing, Session};
