use std::time::Duration;

#[must_use]
pub fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// Elapsed-time tracker for a transient visual state with a declared duration.
#[derive(Debug, Clone)]
pub struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increases_progress() {
        let mut timer = EffectTimer::new(Duration::from_millis(400));
        timer.advance(Duration::from_millis(100));
        assert!((timer.progress() - 0.25).abs() < 1e-4);
    }

    #[test]
    fn finished_after_duration() {
        let mut timer = EffectTimer::new(Duration::from_millis(300));
        timer.advance(Duration::from_millis(350));
        assert!((timer.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_duration_immediately_finished() {
        let timer = EffectTimer::new(Duration::ZERO);
        assert!((timer.progress() - 1.0).abs() < f32::EPSILON);
    }
}
