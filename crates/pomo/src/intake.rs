//! Startup questions
//!
//! Asks for the three durations, re-asking the same question until the
//! answer parses and falls inside the question's bounds.

use std::io::{self, BufRead, Write};

use crossterm::style::Color;
use thiserror::Error;

use crate::render::Palette;
use crate::schedule::SessionConfig;

const INVALID_INPUT: &str = "❌ Invalid input. Please try again.";

/// Errors that re-prompting cannot recover from
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("input closed before a valid value was entered")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A bounded numeric question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Question {
    pub prompt: &'static str,
    /// Exclusive upper bound, in minutes
    pub max: f64,
}

impl Question {
    pub const WORK: Question = Question {
        prompt: "Work duration (minutes): ",
        max: 180.0,
    };

    pub const SHORT_BREAK: Question = Question {
        prompt: "Short break duration (minutes): ",
        max: 60.0,
    };

    pub const LONG_BREAK: Question = Question {
        prompt: "Long break duration (minutes): ",
        max: 120.0,
    };

    /// `0 < value < max`; NaN is never accepted
    pub fn accepts(&self, value: f64) -> bool {
        value > 0.0 && value < self.max
    }

    /// Parse and validate a textual answer
    pub fn parse(&self, answer: &str) -> Option<f64> {
        leading_number(answer).filter(|v| self.accepts(*v))
    }
}

/// Read the decimal number at the start of `text`, ignoring anything after it.
///
/// Leading whitespace is skipped, so `" 25 min"` reads as 25. Text that does
/// not start with a digit, or a sign or dot followed by one, yields `None`.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }

    // An exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Answers supplied up front; `None` means ask
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Prefill {
    pub work: Option<f64>,
    pub short_break: Option<f64>,
    pub long_break: Option<f64>,
}

/// Prompt until `valid` accepts a number, then return it
pub fn request_validated_number<R, W, F>(
    input: &mut R,
    output: &mut W,
    palette: Palette,
    prompt: &str,
    valid: F,
) -> Result<f64, IntakeError>
where
    R: BufRead,
    W: Write,
    F: Fn(f64) -> bool,
{
    let mut line = String::new();
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Err(IntakeError::InputClosed);
        }

        match leading_number(&line) {
            Some(value) if valid(value) => return Ok(value),
            _ => {}
        }

        tracing::debug!(answer = line.trim(), "rejected answer");
        writeln!(output, "{}", palette.paint(INVALID_INPUT, Color::Red))?;
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    palette: Palette,
    question: Question,
    prefilled: Option<f64>,
) -> Result<f64, IntakeError> {
    match prefilled {
        Some(value) => Ok(value),
        None => request_validated_number(input, output, palette, question.prompt, |v| question.accepts(v)),
    }
}

/// Gather the session configuration, asking only for missing values
pub fn gather<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    palette: Palette,
    prefill: Prefill,
) -> Result<SessionConfig, IntakeError> {
    let work_minutes = ask(input, output, palette, Question::WORK, prefill.work)?;
    let short_break_minutes = ask(input, output, palette, Question::SHORT_BREAK, prefill.short_break)?;
    let long_break_minutes = ask(input, output, palette, Question::LONG_BREAK, prefill.long_break)?;

    Ok(SessionConfig {
        work_minutes,
        short_break_minutes,
        long_break_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, prefill: Prefill) -> (Result<SessionConfig, IntakeError>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = gather(&mut reader, &mut out, Palette::plain(), prefill);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_bounds() {
        assert!(Question::WORK.accepts(25.0));
        assert!(Question::WORK.accepts(179.9));
        assert!(!Question::WORK.accepts(180.0));
        assert!(!Question::WORK.accepts(0.0));
        assert!(!Question::WORK.accepts(-5.0));
        assert!(!Question::WORK.accepts(f64::NAN));
        assert!(!Question::SHORT_BREAK.accepts(60.0));
        assert!(Question::LONG_BREAK.accepts(119.0));
        assert!(!Question::LONG_BREAK.accepts(120.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Question::WORK.parse(" 25 \n"), Some(25.0));
        assert_eq!(Question::WORK.parse("0.5"), Some(0.5));
        assert_eq!(Question::WORK.parse("abc"), None);
        assert_eq!(Question::WORK.parse(""), None);
        assert_eq!(Question::WORK.parse("inf"), None);
        assert_eq!(Question::WORK.parse("NaN"), None);
        assert_eq!(Question::WORK.parse("25abc"), Some(25.0));
        assert_eq!(Question::SHORT_BREAK.parse("5 minutes"), Some(5.0));
        assert_eq!(Question::WORK.parse("-5 min"), None);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("  42.5xyz"), Some(42.5));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("+3"), Some(3.0));
        assert_eq!(leading_number("-7"), Some(-7.0));
        assert_eq!(leading_number("1e2 seconds"), Some(100.0));
        assert_eq!(leading_number("2e"), Some(2.0));
        assert_eq!(leading_number("3e+"), Some(3.0));
        assert_eq!(leading_number("1.5.5"), Some(1.5));
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("inf"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        let (result, out) = run("25abc\n5 minutes\n15\n", Prefill::default());
        let config = result.unwrap();

        assert_eq!(config.work_minutes, 25.0);
        assert_eq!(config.short_break_minutes, 5.0);
        assert_eq!(config.long_break_minutes, 15.0);
        assert!(!out.contains(INVALID_INPUT));
    }

    #[test]
    fn test_gather_all_three() {
        let (result, out) = run("25\n5\n15\n", Prefill::default());
        let config = result.unwrap();

        assert_eq!(config.work_minutes, 25.0);
        assert_eq!(config.short_break_minutes, 5.0);
        assert_eq!(config.long_break_minutes, 15.0);
        assert_eq!(
            out,
            "Work duration (minutes): Short break duration (minutes): Long break duration (minutes): "
        );
    }

    #[test]
    fn test_invalid_work_reprompts_same_question() {
        let (result, out) = run("abc\n-5\n999\n25\n5\n15\n", Prefill::default());
        assert!(result.is_ok());

        let work_prompts = out.matches(Question::WORK.prompt).count();
        assert_eq!(work_prompts, 4);
        assert_eq!(out.matches(INVALID_INPUT).count(), 3);

        // Every rejection is followed by the work prompt, not the next question
        let first_short = out.find(Question::SHORT_BREAK.prompt).unwrap();
        let last_invalid = out.rfind(INVALID_INPUT).unwrap();
        assert!(last_invalid < first_short);
    }

    #[test]
    fn test_invalid_answers_never_advance() {
        let (result, out) = run("abc\n-5\n999\n", Prefill::default());
        assert!(matches!(result, Err(IntakeError::InputClosed)));
        assert_eq!(out.matches(Question::WORK.prompt).count(), 4);
        assert!(!out.contains(Question::SHORT_BREAK.prompt));
    }

    #[test]
    fn test_prefilled_values_are_not_asked() {
        let prefill = Prefill {
            work: Some(50.0),
            short_break: None,
            long_break: Some(20.0),
        };
        let (result, out) = run("10\n", prefill);
        let config = result.unwrap();

        assert_eq!(config.work_minutes, 50.0);
        assert_eq!(config.short_break_minutes, 10.0);
        assert_eq!(config.long_break_minutes, 20.0);
        assert_eq!(out, Question::SHORT_BREAK.prompt);
    }

    #[test]
    fn test_request_validated_number_custom_predicate() {
        let mut reader = Cursor::new(b"7\nx\n8\n".to_vec());
        let mut out = Vec::new();
        let even = |v: f64| v % 2.0 == 0.0;

        let value = request_validated_number(&mut reader, &mut out, Palette::plain(), "n: ", even).unwrap();
        assert_eq!(value, 8.0);
        assert_eq!(String::from_utf8(out).unwrap(), format!("n: {0}\nn: {0}\nn: ", INVALID_INPUT));
    }
}
