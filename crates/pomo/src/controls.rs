//! Keyboard controls
//!
//! A [`Controls`] value is one keypress subscription. For the real terminal
//! it owns a listener thread that reads crossterm events in raw mode; the
//! thread stops and the terminal is restored when the subscription drops.

use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::sync::mpsc;

/// How long the listener blocks on the terminal before checking for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A control command issued from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Skip,
    Quit,
}

impl Control {
    /// Map a key event to a control. Unbound keys yield `None`.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Control::Quit),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'p' => Some(Control::Pause),
                'r' => Some(Control::Resume),
                's' => Some(Control::Skip),
                'q' => Some(Control::Quit),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One keypress subscription
pub struct Controls {
    rx: mpsc::UnboundedReceiver<Control>,
    _listener: Option<KeyListener>,
}

impl Controls {
    /// Subscription fed by the returned sender
    pub fn channel() -> (mpsc::UnboundedSender<Control>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx, _listener: None })
    }

    /// Subscription that never yields a control
    pub fn detached() -> Self {
        let (_, controls) = Self::channel();
        controls
    }

    /// Subscribe to the process terminal.
    ///
    /// Falls back to a detached subscription when stdin is not a terminal.
    pub fn terminal() -> io::Result<Self> {
        if !io::stdin().is_terminal() {
            tracing::debug!("stdin is not a terminal, keyboard controls disabled");
            return Ok(Self::detached());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let listener = KeyListener::spawn(tx)?;
        Ok(Self {
            rx,
            _listener: Some(listener),
        })
    }

    /// Next control, or `None` once the source has gone away
    pub async fn recv(&mut self) -> Option<Control> {
        self.rx.recv().await
    }
}

/// Opens keypress subscriptions
pub trait Keyboard {
    fn subscribe(&mut self) -> io::Result<Controls>;
}

/// The controlling terminal
#[derive(Debug, Default)]
pub struct TerminalKeyboard;

impl Keyboard for TerminalKeyboard {
    fn subscribe(&mut self) -> io::Result<Controls> {
        Controls::terminal()
    }
}

/// Background thread translating terminal key events into controls
struct KeyListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyListener {
    fn spawn(tx: mpsc::UnboundedSender<Control>) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let spawned = std::thread::Builder::new()
            .name("pomo-keys".to_string())
            .spawn(move || listen(tx, flag));

        match spawned {
            Ok(handle) => Ok(Self {
                stop,
                handle: Some(handle),
            }),
            Err(err) => {
                let _ = terminal::disable_raw_mode();
                Err(err)
            }
        }
    }
}

// Runs on the runtime thread when a session releases its subscription. The
// join blocks for at most one POLL_INTERVAL. It has to finish before the next
// listener starts, or the old thread could swallow that session's first key.
impl Drop for KeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("key listener thread panicked");
            }
        }
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}

fn listen(tx: mpsc::UnboundedSender<Control>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                tracing::warn!(error = %err, "terminal poll failed");
                return;
            }
        }

        match event::read() {
            Ok(Event::Key(key)) => {
                if let Some(control) = Control::from_key(&key) {
                    tracing::debug!(?control, "key pressed");
                    if tx.send(control).is_err() {
                        return;
                    }
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "terminal read failed");
                return;
            }
        }
    }
}
