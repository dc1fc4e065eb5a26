use chrono::{DateTime, Utc};

/// Time remaining until kickoff, decomposed for display. Days are
/// unbounded; the other segments are modulo their natural range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Floor-decompose `target - now`. None once the target has passed
/// (`now >= target`).
pub fn time_left(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<TimeLeft> {
    let diff = (target - now).num_milliseconds();
    if diff <= 0 {
        return None;
    }
    Some(TimeLeft {
        days: diff / 86_400_000,
        hours: (diff / 3_600_000) % 24,
        minutes: (diff / 60_000) % 60,
        seconds: (diff / 1_000) % 60,
    })
}

/// Result of one engine tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still counting down.
    Running(TimeLeft),
    /// The target was just crossed. Emitted exactly once per target; the
    /// owner is expected to re-check the match (refresh) on this signal.
    Finished,
    /// Settled; the engine stays quiet until the target is reset.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Counting,
    Settled,
}

/// One-shot countdown to a kickoff instant. Driven by the owner's 1 s
/// tick; holds no timer of its own, so dropping it cancels everything.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    target: DateTime<Utc>,
    phase: Phase,
}

impl CountdownEngine {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            phase: Phase::Counting,
        }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownTick {
        match self.phase {
            Phase::Counting => match time_left(self.target, now) {
                Some(left) => CountdownTick::Running(left),
                None => {
                    self.phase = Phase::Settled;
                    CountdownTick::Finished
                }
            },
            Phase::Settled => CountdownTick::Idle,
        }
    }

    /// Point the engine at a new target (new selection) and start over.
    pub fn reset(&mut self, target: DateTime<Utc>) {
        self.target = target;
        self.phase = Phase::Counting;
    }
}
