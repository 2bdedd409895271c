//! The fixed session sequence
//!
//! Four work sessions separated by short breaks, closed by a long break.
//! The schedule hands sessions out in order and wraps back to the first.

use crate::mode::Mode;

/// Number of sessions in one cycle
pub const CYCLE_LEN: usize = 8;

/// Validated durations gathered at startup, in minutes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub work_minutes: f64,
    pub short_break_minutes: f64,
    pub long_break_minutes: f64,
}

impl SessionConfig {
    /// Materialize one cycle of sessions
    pub fn sessions(&self) -> [SessionSpec; CYCLE_LEN] {
        let work = SessionSpec::from_minutes(Mode::Work, self.work_minutes);
        let short = SessionSpec::from_minutes(Mode::ShortBreak, self.short_break_minutes);
        let long = SessionSpec::from_minutes(Mode::LongBreak, self.long_break_minutes);

        [work, short, work, short, work, short, work, long]
    }
}

/// One timed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSpec {
    pub mode: Mode,
    pub duration_seconds: u64,
}

impl SessionSpec {
    /// Convert minutes to whole seconds, rounding a partial second up and
    /// never going below one
    pub fn from_minutes(mode: Mode, minutes: f64) -> Self {
        let seconds = (minutes * 60.0).ceil().max(1.0) as u64;
        Self {
            mode,
            duration_seconds: seconds,
        }
    }
}

/// Result of moving the cursor forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    /// The last session finished; the cursor is back at the start
    CycleComplete,
}

/// Cursor over the fixed cycle
#[derive(Debug, Clone)]
pub struct Schedule {
    sessions: [SessionSpec; CYCLE_LEN],
    cursor: usize,
}

impl Schedule {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: config.sessions(),
            cursor: 0,
        }
    }

    pub fn current(&self) -> SessionSpec {
        self.sessions[self.cursor]
    }

    /// Zero-based position of the current session
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn advance(&mut self) -> Advance {
        self.cursor += 1;
        if self.cursor >= self.sessions.len() {
            self.cursor = 0;
            Advance::CycleComplete
        } else {
            Advance::Next
        }
    }
}
