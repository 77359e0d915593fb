//! Progress projection: elapsed/total/ratio over the media clock.

/// Last reported position of one loaded source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    /// Seconds into the source.
    pub elapsed: f64,
    /// Source duration in seconds, `None` until metadata arrives.
    pub total: Option<f64>,
}

impl Progress {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply_time_update(&mut self, offset: f64) {
        self.elapsed = self.clamp(offset);
    }

    /// Record the duration. Non-finite or negative durations (live streams)
    /// leave the total unknown.
    pub fn apply_metadata(&mut self, duration: f64) {
        self.total = (duration.is_finite() && duration >= 0.0).then_some(duration);
        self.elapsed = self.clamp(self.elapsed);
    }

    pub fn ratio(&self) -> f64 {
        completion_ratio(self.elapsed, self.total)
    }

    pub fn remaining(&self) -> Option<f64> {
        self.total.map(|t| (t - self.elapsed).max(0.0))
    }

    /// Whether anything is known about this source yet.
    pub fn is_pristine(&self) -> bool {
        self.elapsed == 0.0 && self.total.is_none_or(|t| t == 0.0)
    }

    fn clamp(&self, offset: f64) -> f64 {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        match self.total {
            Some(total) => offset.min(total),
            None => offset,
        }
    }
}

/// `elapsed / total`, or 0 when the total is unknown or zero.
pub fn completion_ratio(elapsed: f64, total: Option<f64>) -> f64 {
    match total {
        Some(total) if total > 0.0 && total.is_finite() && elapsed.is_finite() => {
            (elapsed / total).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Format seconds as `m:ss`, flooring and zero-padding the seconds.
/// Unknown (NaN, infinite or negative) input renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let mins = (secs / 60.0).floor() as u64;
    let secs = (secs % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}
