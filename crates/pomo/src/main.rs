//! pomo - Interactive Pomodoro timer
//!
//! Usage:
//!   pomo                        Ask for durations, then start cycling
//!   pomo --preset deep          90 min work, 20 min break, 30 min long break
//!   pomo --work 50              Only ask for the break durations
//!   pomo --no-notify            Keep desktop notifications off

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pomo_core::{Paths, Settings};
use pomo_notify::{DesktopNotifier, Muted, Notifier};
use tracing_subscriber::EnvFilter;

use pomo::intake::{self, Prefill, Question};
use pomo::{Alerts, Palette, Preset, Renderer, Runner, Schedule, TerminalKeyboard};

/// pomo - Pomodoro timer for the terminal
#[derive(Parser, Debug)]
#[command(name = "pomo")]
#[command(about = "Interactive Pomodoro timer with live progress and desktop notifications")]
#[command(version)]
#[command(after_help = r#"CYCLE:
    Work, Break, Work, Break, Work, Break, Work, Long Break
    After the long break the cycle restarts.

KEYS (while a session runs):
    p    Pause
    r    Resume
    s    Skip to the next session
    q    Quit

PRESETS:
    pomodoro    25 min work, 5 min break, 15 min long break
    deep        90 min work, 20 min break, 30 min long break
    quick       15 min work, 3 min break, 10 min long break

EXAMPLES:
    pomo                        # Answer three questions and start
    pomo --preset pomodoro      # Classic 25/5/15 without questions
    pomo --preset deep --work 60
    pomo --no-notify

SETTINGS:
    ~/.config/pomo/config.json  notifications, sound, icon, restart_delay_secs
"#)]
struct Cli {
    /// Work duration in minutes (0 < MINS < 180)
    #[arg(long, value_name = "MINS", value_parser = parse_work)]
    work: Option<f64>,

    /// Short break duration in minutes (0 < MINS < 60)
    #[arg(long, value_name = "MINS", value_parser = parse_short_break)]
    short_break: Option<f64>,

    /// Long break duration in minutes (0 < MINS < 120)
    #[arg(long, value_name = "MINS", value_parser = parse_long_break)]
    long_break: Option<f64>,

    /// Answer all three questions with a preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Disable desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Notification icon
    #[arg(long, value_name = "PATH")]
    icon: Option<PathBuf>,
}

impl Cli {
    /// Explicit flags win over the preset
    fn prefill(&self) -> Prefill {
        Prefill {
            work: self.work.or(self.preset.map(|p| p.work_minutes())),
            short_break: self.short_break.or(self.preset.map(|p| p.short_break_minutes())),
            long_break: self.long_break.or(self.preset.map(|p| p.long_break_minutes())),
        }
    }

    /// `--no-notify` and the settings file can each turn notifications off
    fn notifications_enabled(&self, settings: &Settings) -> bool {
        !self.no_notify && settings.notifications
    }

    fn notifier(&self, settings: &Settings) -> Box<dyn Notifier> {
        if self.notifications_enabled(settings) {
            Box::new(DesktopNotifier::detect())
        } else {
            Box::new(Muted)
        }
    }

    /// `--icon`, then the settings file, then the asset beside the executable
    fn icon(&self, settings: &Settings, paths: &Paths) -> Option<String> {
        self.icon
            .clone()
            .or_else(|| settings.icon.clone())
            .or_else(|| paths.icon())
            .map(|path| path.to_string_lossy().into_owned())
    }
}

fn parse_minutes(question: Question, value: &str) -> Result<f64, String> {
    question
        .parse(value)
        .ok_or_else(|| format!("expected a number of minutes between 0 and {} (exclusive)", question.max))
}

fn parse_work(value: &str) -> Result<f64, String> {
    parse_minutes(Question::WORK, value)
}

fn parse_short_break(value: &str) -> Result<f64, String> {
    parse_minutes(Question::SHORT_BREAK, value)
}

fn parse_long_break(value: &str) -> Result<f64, String> {
    parse_minutes(Question::LONG_BREAK, value)
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the progress line
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Paths::new();
    let settings = Settings::load(&paths.settings_file()).context("Failed to load settings")?;
    let palette = Palette::detect(cli.no_color);

    let config = {
        let mut input = io::stdin().lock();
        let mut output = io::stdout().lock();
        intake::gather(&mut input, &mut output, palette, cli.prefill()).context("Failed to read durations")?
    };
    tracing::debug!(?config, "configuration accepted");

    let notifier = cli.notifier(&settings);
    let alerts = Alerts::new(notifier.as_ref(), cli.icon(&settings, &paths), settings.sound);

    let renderer = Renderer::new(io::stdout(), palette);
    let mut runner = Runner::new(Schedule::new(&config), renderer, TerminalKeyboard, alerts)
        .with_restart_delay(settings.restart_delay());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(runner.run()).context("Timer failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_asks_everything() {
        let cli = Cli::try_parse_from(["pomo"]).unwrap();
        assert_eq!(cli.prefill(), Prefill::default());
        assert!(!cli.no_notify);
    }

    #[test]
    fn test_preset_fills_all() {
        let cli = Cli::try_parse_from(["pomo", "--preset", "deep"]).unwrap();
        let prefill = cli.prefill();
        assert_eq!(prefill.work, Some(90.0));
        assert_eq!(prefill.short_break, Some(20.0));
        assert_eq!(prefill.long_break, Some(30.0));
    }

    #[test]
    fn test_flags_override_preset() {
        let cli = Cli::try_parse_from(["pomo", "--preset", "pomodoro", "--work", "50"]).unwrap();
        let prefill = cli.prefill();
        assert_eq!(prefill.work, Some(50.0));
        assert_eq!(prefill.short_break, Some(5.0));
    }

    #[test]
    fn test_out_of_range_flags_rejected() {
        assert!(Cli::try_parse_from(["pomo", "--work", "180"]).is_err());
        assert!(Cli::try_parse_from(["pomo", "--work", "abc"]).is_err());
        assert!(Cli::try_parse_from(["pomo", "--short-break", "-5"]).is_err());
        assert!(Cli::try_parse_from(["pomo", "--long-break", "999"]).is_err());
        assert!(Cli::try_parse_from(["pomo", "--preset", "forever"]).is_err());
    }

    #[test]
    fn test_switches() {
        let cli = Cli::try_parse_from(["pomo", "--no-notify", "--no-color", "--icon", "/tmp/i.png"]).unwrap();
        assert!(cli.no_notify);
        assert!(cli.no_color);
        assert_eq!(cli.icon, Some(PathBuf::from("/tmp/i.png")));
    }

    #[test]
    fn test_notifications_enabled() {
        let on = Settings::default();
        let off = Settings {
            notifications: false,
            ..Settings::default()
        };

        let cli = Cli::try_parse_from(["pomo"]).unwrap();
        assert!(cli.notifications_enabled(&on));
        assert!(!cli.notifications_enabled(&off));

        let cli = Cli::try_parse_from(["pomo", "--no-notify"]).unwrap();
        assert!(!cli.notifications_enabled(&on));
        assert!(!cli.notifications_enabled(&off));
    }

    #[test]
    fn test_icon_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(pomo_core::paths::ICON_FILE), b"png").unwrap();
        let paths = Paths {
            config: dir.path().join("cfg"),
            install: Some(dir.path().to_path_buf()),
        };
        let bundled = dir.path().join(pomo_core::paths::ICON_FILE).to_string_lossy().into_owned();
        let configured = Settings {
            icon: Some(PathBuf::from("/opt/pomo/tomato.png")),
            ..Settings::default()
        };

        let cli = Cli::try_parse_from(["pomo"]).unwrap();
        assert_eq!(cli.icon(&Settings::default(), &paths), Some(bundled));
        assert_eq!(cli.icon(&configured, &paths).as_deref(), Some("/opt/pomo/tomato.png"));

        let cli = Cli::try_parse_from(["pomo", "--icon", "/tmp/i.png"]).unwrap();
        assert_eq!(cli.icon(&configured, &paths).as_deref(), Some("/tmp/i.png"));
    }

    #[test]
    fn test_no_icon_anywhere() {
        let paths = Paths {
            config: PathBuf::from("/nonexistent/cfg"),
            install: None,
        };
        let cli = Cli::try_parse_from(["pomo"]).unwrap();
        assert_eq!(cli.icon(&Settings::default(), &paths), None);
    }
}
