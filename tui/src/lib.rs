//! breathe TUI - terminal front end for the breathing engine
//!
//! Everything time-related lives in `breathe-engine`; this crate supplies the
//! real-world edges the engine's seams expect.
//!
//! # Architecture
//!
//! - **Keymap**: crossterm key events to engine [`InputEvent`]s
//! - **Render**: ratatui drawing of engine render frames
//! - **Audio**: rodio playback of synthesized cue tones
//! - **Cli**: argument parsing, configuration, exit codes
//!
//! [`InputEvent`]: breathe_engine::InputEvent

pub mod app;
pub mod audio;
pub mod cli;
pub mod keymap;
pub mod listing;
pub mod render;
pub mod theme;

pub use app::App;
