//! Session timer
//!
//! [`TimerState`] is the countdown state machine. [`SessionTimer`] drives it
//! from a one-second tick and a keypress subscription, both owned by the
//! timer and released together when the session ends.
//!
//! ```text
//! Idle -> Running <-> Paused -> Finished
//!            \          /
//!             +-> Quit <+
//! ```

use std::io::{self, Write};
use std::time::Duration;

use chrono::Local;
use pomo_notify::{Notification, Notifier};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::controls::{Control, Controls};
use crate::render::{Notice, Renderer};
use crate::schedule::SessionSpec;

/// Tick period
pub const TICK: Duration = Duration::from_secs(1);

/// Lifecycle of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Finished,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Render `remaining`, then count down one second
    Progress { remaining: u64 },
    /// Countdown reached zero; the session is finished
    Expired,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Skipped,
    Quit,
}

/// Countdown state for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    remaining: u64,
    total: u64,
    phase: Phase,
}

impl TimerState {
    /// Start a running countdown
    pub fn start(duration_seconds: u64) -> Self {
        Self {
            remaining: duration_seconds,
            total: duration_seconds,
            phase: Phase::Running,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance one second. Ticks outside `Running` do nothing.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.phase != Phase::Running {
            return None;
        }

        if self.remaining == 0 {
            self.phase = Phase::Finished;
            return Some(Tick::Expired);
        }

        let remaining = self.remaining;
        self.remaining -= 1;
        Some(Tick::Progress { remaining })
    }

    /// Returns whether the pause was honored
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        true
    }

    /// Returns whether the resume was honored
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// End the countdown early (skip or quit)
    pub fn stop(&mut self) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        self.phase = Phase::Finished;
        true
    }
}

/// Notification settings for finished sessions
pub struct Alerts<'a> {
    notifier: &'a dyn Notifier,
    icon: Option<String>,
    sound: bool,
}

impl<'a> Alerts<'a> {
    pub fn new(notifier: &'a dyn Notifier, icon: Option<String>, sound: bool) -> Self {
        Self { notifier, icon, sound }
    }

    /// The notification sent when a session of `spec`'s mode completes
    pub fn notification(&self, spec: &SessionSpec) -> Notification {
        let label = spec.mode.label();
        let mut notification = Notification::new(label.notification_message).with_title(label.notification_title);
        if let Some(icon) = &self.icon {
            notification = notification.with_icon(icon);
        }
        if !self.sound {
            notification = notification.silent();
        }
        notification
    }

    fn fire(&self, spec: &SessionSpec) {
        self.notifier.notify(self.notification(spec));
    }
}

/// A running session: countdown plus the tick and keypress handles
pub struct SessionTimer {
    spec: SessionSpec,
    state: TimerState,
    ticker: Option<Interval>,
    controls: Option<Controls>,
}

impl SessionTimer {
    pub fn new(spec: SessionSpec, controls: Controls) -> Self {
        Self {
            spec,
            state: TimerState::start(spec.duration_seconds),
            ticker: None,
            controls: Some(controls),
        }
    }

    /// Run the session until it completes, is skipped, or the user quits
    pub async fn run<W: Write>(mut self, out: &mut Renderer<W>, alerts: &Alerts<'_>) -> io::Result<SessionOutcome> {
        let label = self.spec.mode.label();
        let ends_at = Local::now() + chrono::Duration::seconds(self.spec.duration_seconds as i64);
        out.start_banner(label, self.spec.duration_seconds, &ends_at.format("%H:%M").to_string())?;
        out.legend()?;

        self.ticker = Some(new_ticker());
        tracing::debug!(mode = self.spec.mode.as_str(), seconds = self.spec.duration_seconds, "session started");

        loop {
            tokio::select! {
                _ = next_tick(&mut self.ticker) => {
                    if let Some(outcome) = self.on_tick(out, alerts)? {
                        return Ok(outcome);
                    }
                }
                control = next_control(&mut self.controls) => match control {
                    Some(control) => {
                        if let Some(outcome) = self.on_control(control, out)? {
                            return Ok(outcome);
                        }
                    }
                    None => {
                        tracing::debug!("keyboard closed, counting down without controls");
                        self.controls = None;
                    }
                },
            }
        }
    }

    fn on_tick<W: Write>(&mut self, out: &mut Renderer<W>, alerts: &Alerts<'_>) -> io::Result<Option<SessionOutcome>> {
        let label = self.spec.mode.label();
        match self.state.tick() {
            Some(Tick::Progress { remaining }) => {
                out.progress(label, self.state.total(), remaining)?;
                Ok(None)
            }
            Some(Tick::Expired) => {
                self.ticker = None;
                out.progress(label, self.state.total(), 0)?;
                out.end_progress()?;
                out.completion(label)?;
                alerts.fire(&self.spec);
                self.release();
                tracing::debug!(mode = self.spec.mode.as_str(), "session completed");
                Ok(Some(SessionOutcome::Completed))
            }
            None => Ok(None),
        }
    }

    fn on_control<W: Write>(&mut self, control: Control, out: &mut Renderer<W>) -> io::Result<Option<SessionOutcome>> {
        match control {
            Control::Pause => {
                if self.state.pause() {
                    self.ticker = None;
                    out.notice(Notice::Paused)?;
                    tracing::debug!(remaining = self.state.remaining(), "paused");
                }
                Ok(None)
            }
            Control::Resume => {
                if self.state.resume() {
                    out.notice(Notice::Resumed)?;
                    self.ticker = Some(new_ticker());
                    tracing::debug!(remaining = self.state.remaining(), "resumed");
                }
                Ok(None)
            }
            Control::Skip => {
                self.state.stop();
                self.ticker = None;
                out.notice(Notice::Skipped)?;
                self.release();
                tracing::debug!(mode = self.spec.mode.as_str(), "session skipped");
                Ok(Some(SessionOutcome::Skipped))
            }
            Control::Quit => {
                self.state.stop();
                self.ticker = None;
                out.notice(Notice::Quit)?;
                self.release();
                tracing::debug!("quit requested");
                Ok(Some(SessionOutcome::Quit))
            }
        }
    }

    /// Drop the keypress subscription
    fn release(&mut self) {
        self.controls = None;
    }
}

/// A one-second interval whose first tick is one period away
fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn next_control(controls: &mut Option<Controls>) -> Option<Control> {
    match controls {
        Some(controls) => controls.recv().await,
        None => std::future::pending().await,
    }
}
