use std::time::Duration;

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Linear tween of one offset toward a resting target.
#[derive(Debug, Clone, PartialEq)]
pub struct SettleAnimation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

impl SettleAnimation {
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, elapsed: Duration::ZERO, duration }
    }

    /// Step the clock and return the interpolated value.
    pub fn advance(&mut self, delta: Duration) -> f64 {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.value()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.progress()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
