//! Seek controller: pointer position to playback offset.

/// Result of a seek request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekOutcome {
    /// The element was moved to this offset (seconds).
    Applied(f64),
    /// The duration is not known yet; nothing happened.
    NotReady,
}

fn seekable(total: Option<f64>) -> Option<f64> {
    total.filter(|t| t.is_finite() && *t > 0.0)
}

/// Offset for a fractional bar position. Positions outside [0, 1] from drag
/// overshoot clamp to the ends.
pub fn seek_target(fraction: f64, total: Option<f64>) -> Option<f64> {
    let total = seekable(total)?;
    let fraction = if fraction.is_nan() { 0.0 } else { fraction };
    Some((fraction * total).clamp(0.0, total))
}

/// Offset after scrubbing `delta` seconds from `current`.
pub fn scrub_target(current: f64, delta: f64, total: Option<f64>) -> Option<f64> {
    let total = seekable(total)?;
    Some((current + delta).clamp(0.0, total))
}

/// Fraction along a horizontal bar for a pointer at `column`.
pub fn pointer_fraction(column: u16, bar_x: u16, bar_width: u16) -> f64 {
    if bar_width == 0 {
        return 0.0;
    }
    (f64::from(column) - f64::from(bar_x)) / f64::from(bar_width)
}
