//! Session sequence loop
//!
//! Runs the schedule forever: each session gets a fresh timer and keypress
//! subscription, and the loop waits for its outcome before moving on.

use std::io::{self, Write};
use std::time::Duration;

use tokio::time::sleep;

use crate::controls::{Control, Controls, Keyboard};
use crate::render::{Notice, Renderer};
use crate::schedule::{Advance, Schedule};
use crate::timer::{Alerts, SessionOutcome, SessionTimer};

/// Drives the schedule until the user quits
pub struct Runner<'a, W: Write, K: Keyboard> {
    schedule: Schedule,
    renderer: Renderer<W>,
    keyboard: K,
    alerts: Alerts<'a>,
    restart_delay: Duration,
}

impl<'a, W: Write, K: Keyboard> Runner<'a, W, K> {
    pub fn new(schedule: Schedule, renderer: Renderer<W>, keyboard: K, alerts: Alerts<'a>) -> Self {
        Self {
            schedule,
            renderer,
            keyboard,
            alerts,
            restart_delay: Duration::from_secs(5),
        }
    }

    /// Override the pause between cycles
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    pub fn renderer(&self) -> &Renderer<W> {
        &self.renderer
    }

    /// Run sessions until one ends in quit
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            let spec = self.schedule.current();
            tracing::info!(
                position = self.schedule.position() + 1,
                mode = spec.mode.as_str(),
                seconds = spec.duration_seconds,
                "starting session"
            );

            let controls = self.keyboard.subscribe()?;
            let outcome = SessionTimer::new(spec, controls)
                .run(&mut self.renderer, &self.alerts)
                .await?;

            if outcome == SessionOutcome::Quit {
                return Ok(());
            }

            if self.schedule.advance() == Advance::CycleComplete {
                self.renderer.notice(Notice::Restarting {
                    seconds: self.restart_delay.as_secs(),
                })?;
                if self.restart_pause().await? {
                    self.renderer.notice(Notice::Quit)?;
                    return Ok(());
                }
            }
        }
    }

    /// Wait out the restart delay. Returns `true` if the user quit meanwhile.
    async fn restart_pause(&mut self) -> io::Result<bool> {
        let mut controls = self.keyboard.subscribe()?;
        tokio::select! {
            _ = sleep(self.restart_delay) => Ok(false),
            _ = wait_for_quit(&mut controls) => Ok(true),
        }
    }
}

async fn wait_for_quit(controls: &mut Controls) {
    loop {
        match controls.recv().await {
            Some(Control::Quit) => return,
            Some(_) => {}
            None => std::future::pending::<()>().await,
        }
    }
}
