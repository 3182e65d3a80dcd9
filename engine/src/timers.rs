//! Deadline bookkeeping for reducer timeouts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::TimerKind;

/// One pending deadline per timer kind. Re-arming a kind replaces it.
#[derive(Debug, Default)]
pub struct TimerWheel {
    pending: HashMap<TimerKind, (u64, Instant)>,
}

impl TimerWheel {
    pub fn arm(&mut self, timer: TimerKind, generation: u64, deadline: Instant) {
        self.pending.insert(timer, (generation, deadline));
    }

    pub fn arm_after(&mut self, timer: TimerKind, generation: u64, now: Instant, after: Duration) {
        self.arm(timer, generation, now + after);
    }

    pub fn disarm(&mut self, timer: TimerKind) {
        self.pending.remove(&timer);
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerKind, u64)> {
        let mut due: Vec<(Instant, TimerKind, u64)> = self
            .pending
            .iter()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .map(|(timer, (generation, deadline))| (*deadline, *timer, *generation))
            .collect();
        for (_, timer, _) in &due {
            self.pending.remove(timer);
        }
        due.sort_by_key(|(deadline, _, _)| *deadline);
        due.into_iter()
            .map(|(_, timer, generation)| (timer, generation))
            .collect()
    }
}
