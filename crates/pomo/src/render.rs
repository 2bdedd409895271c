//! Terminal output for sessions
//!
//! Everything a session prints goes through [`Renderer`]. Lines end in
//! `\r\n` because keypresses are read with the terminal in raw mode.

use std::io::{self, IsTerminal, Write};

use crossterm::style::{style, Color, Stylize};
use pomo_core::format;

use crate::mode::ModeLabel;

/// Width of the progress bar in cells
pub const BAR_WIDTH: usize = 30;

const FILLED: &str = "■";
const EMPTY: &str = "-";
const EOL: &str = "\r\n";

/// Decides whether output is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Colors only when stdout is a terminal and nobody opted out
    pub fn detect(no_color: bool) -> Self {
        let env_opt_out = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            enabled: !no_color && !env_opt_out && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn colored() -> Self {
        Self { enabled: true }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn paint_bold(&self, text: &str, color: Color) -> String {
        if self.enabled {
            style(text).with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Number of filled cells for a countdown position
pub fn filled_cells(total: u64, remaining: u64) -> usize {
    let fraction = format::elapsed_fraction(total, remaining);
    (BAR_WIDTH as f64 * fraction).round() as usize
}

/// Bar color for an elapsed fraction
pub fn bar_color(fraction: f64) -> Color {
    if fraction >= 0.8 {
        Color::Green
    } else if fraction >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Status notices printed on control keys and cycle boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Paused,
    Resumed,
    Skipped,
    Quit,
    /// A full cycle finished; the next starts after this many seconds
    Restarting { seconds: u64 },
}

/// Writes session output to a terminal (or any writer in tests)
pub struct Renderer<W: Write> {
    out: W,
    palette: Palette,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}{}", text, EOL)?;
        self.out.flush()
    }

    /// Banner printed when a session starts
    pub fn start_banner(&mut self, label: &ModeLabel, duration_seconds: u64, ends_at: &str) -> io::Result<()> {
        let banner = format!(
            "⏳ {} started! {} ({})",
            label.title,
            label.icon,
            format::clock(duration_seconds)
        );
        write!(self.out, "{}", EOL)?;
        let banner = self.palette.paint_bold(&banner, Color::Green);
        let ends = self.palette.paint(&format!("ends at {}", ends_at), Color::DarkGrey);
        self.line(&format!("{} {}", banner, ends))
    }

    pub fn legend(&mut self) -> io::Result<()> {
        let legend = self.palette.paint("Press [p]ause, [r]esume, [s]kip, [q]uit", Color::DarkGrey);
        self.line(&legend)
    }

    /// Redraw the progress line in place
    pub fn progress(&mut self, label: &ModeLabel, total: u64, remaining: u64) -> io::Result<()> {
        let fraction = format::elapsed_fraction(total, remaining);
        let filled = filled_cells(total, remaining);
        let bar = format!("[{}{}]", FILLED.repeat(filled), EMPTY.repeat(BAR_WIDTH - filled));

        write!(
            self.out,
            "\r⏰ {} {} {} {} ",
            self.palette.paint_bold(label.title, Color::Yellow),
            self.palette.paint_bold(&format::clock(remaining), Color::Cyan),
            self.palette.paint(&bar, bar_color(fraction)),
            self.palette.paint(&format!("{}%", format::percent(fraction)), Color::DarkGrey),
        )?;
        self.out.flush()
    }

    /// Close the progress line after its final redraw
    pub fn end_progress(&mut self) -> io::Result<()> {
        self.line("")
    }

    pub fn completion(&mut self, label: &ModeLabel) -> io::Result<()> {
        let message = self.palette.paint_bold(label.done_message, Color::Magenta);
        self.line(&message)
    }

    pub fn notice(&mut self, notice: Notice) -> io::Result<()> {
        let text = match notice {
            Notice::Paused => self.palette.paint("⏸️ Timer paused. Press [r] to resume.", Color::Red),
            Notice::Resumed => self.palette.paint("▶️ Timer resumed.", Color::Green),
            Notice::Skipped => self.palette.paint("⏭️ Timer skipped.", Color::Yellow),
            Notice::Quit => self.palette.paint("❌ Timer stopped by user.", Color::Red),
            Notice::Restarting { seconds } => self.palette.paint_bold(
                &format!("🌀 All Pomodoro sessions completed. 🚀 Restarting in {} seconds...", seconds),
                Color::Green,
            ),
        };

        // Everything but resume interrupts a progress line
        if notice != Notice::Resumed {
            write!(self.out, "{}", EOL)?;
        }
        self.line(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    fn renderer() -> Renderer<Vec<u8>> {
        Renderer::new(Vec::new(), Palette::plain())
    }

    fn output(renderer: &Renderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.get_ref()).into_owned()
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(10, 10), 0);
        assert_eq!(filled_cells(10, 5), 15);
        assert_eq!(filled_cells(10, 0), 30);
        assert_eq!(filled_cells(3, 2), 10);
        assert_eq!(filled_cells(1500, 1499), 0);
    }

    #[test]
    fn test_filled_cells_monotonic() {
        for total in [1u64, 7, 30, 61, 300] {
            let fills: Vec<usize> = (0..=total).rev().map(|r| filled_cells(total, r)).collect();
            assert_eq!(fills.first(), Some(&0));
            assert_eq!(fills.last(), Some(&BAR_WIDTH));
            assert!(fills.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_bar_color_thresholds() {
        assert_eq!(bar_color(0.0), Color::Red);
        assert_eq!(bar_color(0.39), Color::Red);
        assert_eq!(bar_color(0.4), Color::Yellow);
        assert_eq!(bar_color(0.79), Color::Yellow);
        assert_eq!(bar_color(0.8), Color::Green);
        assert_eq!(bar_color(1.0), Color::Green);
    }

    #[test]
    fn test_progress_line() {
        let mut r = renderer();
        r.progress(Mode::Work.label(), 10, 5).unwrap();

        let expected = format!("\r⏰ Work 00:05 [{}{}] 50% ", "■".repeat(15), "-".repeat(15));
        assert_eq!(output(&r), expected);
    }

    #[test]
    fn test_start_banner_and_legend() {
        let mut r = renderer();
        r.start_banner(Mode::LongBreak.label(), 900, "14:05").unwrap();
        r.legend().unwrap();

        let out = output(&r);
        assert!(out.contains("⏳ Long Break started! 🛌 (15:00) ends at 14:05\r\n"));
        assert!(out.ends_with("Press [p]ause, [r]esume, [s]kip, [q]uit\r\n"));
    }

    #[test]
    fn test_notices() {
        let mut r = renderer();
        r.notice(Notice::Paused).unwrap();
        r.notice(Notice::Resumed).unwrap();

        assert_eq!(
            output(&r),
            "\r\n⏸️ Timer paused. Press [r] to resume.\r\n▶️ Timer resumed.\r\n"
        );
    }

    #[test]
    fn test_restart_notice() {
        let mut r = renderer();
        r.notice(Notice::Restarting { seconds: 5 }).unwrap();
        assert_eq!(
            output(&r),
            "\r\n🌀 All Pomodoro sessions completed. 🚀 Restarting in 5 seconds...\r\n"
        );
    }

    #[test]
    fn test_colored_output_has_escapes() {
        let mut r = Renderer::new(Vec::new(), Palette::colored());
        r.progress(Mode::Work.label(), 10, 10).unwrap();
        assert!(output(&r).contains("\x1b["));

        let mut plain = renderer();
        plain.progress(Mode::Work.label(), 10, 10).unwrap();
        assert!(!output(&plain).contains("\x1b["));
    }
}
