//! Time and progress formatting helpers

/// Format a number of seconds as `mm:ss`.
///
/// Minutes are not wrapped at the hour, so 90 minutes renders as `90:00`.
pub fn clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed fraction of a countdown, in `[0, 1]`
pub fn elapsed_fraction(total: u64, remaining: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    let elapsed = total.saturating_sub(remaining);
    elapsed as f64 / total as f64
}

/// Whole percentage for a fraction, rounded to nearest
pub fn percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}
