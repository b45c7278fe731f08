use std::time::{Duration, Instant};

/// Wall-clock budget for the frame generation loop.
///
/// The loop checks the budget only before starting a frame; a frame that is
/// already running is never interrupted.
#[derive(Clone, Copy, Debug)]
pub struct GenerationBudget {
    started: Instant,
    soft_checkpoint: Instant,
    deadline: Instant,
}

impl GenerationBudget {
    pub fn starting_now(budget: Duration, soft_checkpoint: Duration) -> Self {
        Self::starting_at(Instant::now(), budget, soft_checkpoint)
    }

    pub fn starting_at(started: Instant, budget: Duration, soft_checkpoint: Duration) -> Self {
        Self {
            started,
            soft_checkpoint: started + soft_checkpoint.min(budget),
            deadline: started + budget,
        }
    }

    pub fn is_exhausted(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn past_soft_checkpoint(&self, now: Instant) -> bool {
        now >= self.soft_checkpoint
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}
