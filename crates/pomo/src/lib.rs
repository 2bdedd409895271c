//! pomo - Interactive Pomodoro timer
//!
//! Asks for work and break durations, then cycles forever through four
//! work sessions separated by short breaks and closed by a long break.
//!
//! Each session shows a live countdown with a progress bar and listens for:
//! - p: pause
//! - r: resume
//! - s: skip to the next session
//! - q: quit
//!
//! A desktop notification fires whenever a session runs to completion.

pub mod app;
pub mod controls;
pub mod intake;
pub mod mode;
pub mod render;
pub mod schedule;
pub mod timer;

pub use app::Runner;
pub use controls::{Control, Controls, Keyboard, TerminalKeyboard};
pub use intake::{IntakeError, Prefill, Question};
pub use mode::{Mode, ModeLabel, Preset};
pub use render::{Palette, Renderer};
pub use schedule::{Schedule, SessionConfig, SessionSpec};
pub use timer::{Alerts, SessionOutcome, SessionTimer, TimerState};
