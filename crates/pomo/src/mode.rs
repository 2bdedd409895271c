//! Session modes and presets
//!
//! A mode decides how a session is labelled on screen and what the desktop
//! notification says when it ends. Presets pre-answer the startup questions.

/// Category of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

/// Display strings for a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLabel {
    pub title: &'static str,
    pub icon: &'static str,
    /// Printed under the final progress line
    pub done_message: &'static str,
    pub notification_title: &'static str,
    pub notification_message: &'static str,
}

const WORK: ModeLabel = ModeLabel {
    title: "Work",
    icon: "💪",
    done_message: "✅ Done! Time to take a short break. 😌",
    notification_title: "Pomodoro Finished! ✅",
    notification_message: "Take a short break, buddy ☕🧘",
};

const SHORT_BREAK: ModeLabel = ModeLabel {
    title: "Break",
    icon: "☕",
    done_message: "🔁 Break finished! Ready to focus again? 💼",
    notification_title: "Break Finished! 🔔",
    notification_message: "Time to get back to work, let's go! 💼",
};

const LONG_BREAK: ModeLabel = ModeLabel {
    title: "Long Break",
    icon: "🛌",
    done_message: "🎉 Long break over! Let's get energized! 🚀",
    notification_title: "Break Finished! 🔔",
    notification_message: "Time to get back to work, let's go! 💼",
};

impl Mode {
    pub fn label(&self) -> &'static ModeLabel {
        match self {
            Mode::Work => &WORK,
            Mode::ShortBreak => &SHORT_BREAK,
            Mode::LongBreak => &LONG_BREAK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }
}

/// Named duration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Pomodoro: 25 min focus, 5 min break, 15 min long break
    Pomodoro,
    /// Deep: 90 min focus, 20 min break, 30 min long break
    Deep,
    /// Quick: 15 min focus, 3 min break, 10 min long break
    Quick,
}

impl Preset {
    pub fn work_minutes(&self) -> f64 {
        match self {
            Preset::Pomodoro => 25.0,
            Preset::Deep => 90.0,
            Preset::Quick => 15.0,
        }
    }

    pub fn short_break_minutes(&self) -> f64 {
        match self {
            Preset::Pomodoro => 5.0,
            Preset::Deep => 20.0,
            Preset::Quick => 3.0,
        }
    }

    pub fn long_break_minutes(&self) -> f64 {
        match self {
            Preset::Pomodoro => 15.0,
            Preset::Deep => 30.0,
            Preset::Quick => 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::Question;

    #[test]
    fn test_labels() {
        assert_eq!(Mode::Work.label().title, "Work");
        assert_eq!(Mode::ShortBreak.label().title, "Break");
        assert_eq!(Mode::LongBreak.label().title, "Long Break");
        assert_eq!(Mode::Work.label().notification_title, "Pomodoro Finished! ✅");
        assert_eq!(
            Mode::ShortBreak.label().notification_title,
            Mode::LongBreak.label().notification_title
        );
    }

    #[test]
    fn test_presets_are_within_bounds() {
        for preset in [Preset::Pomodoro, Preset::Deep, Preset::Quick] {
            assert!(Question::WORK.accepts(preset.work_minutes()));
            assert!(Question::SHORT_BREAK.accepts(preset.short_break_minutes()));
            assert!(Question::LONG_BREAK.accepts(preset.long_break_minutes()));
        }
    }
}
