use std::time::Instant;

/// Whole seconds since the first move. Driven by explicit ticks, so nothing
/// keeps running once the owning game is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    started_at: Option<Instant>,
    elapsed_secs: u64,
    frozen: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting from `now`. Later calls are ignored.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() && !self.frozen {
            self.started_at = Some(now);
        }
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && !self.frozen
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn tick(&mut self, now: Instant) -> u64 {
        if let (Some(start), false) = (self.started_at, self.frozen) {
            self.elapsed_secs = now.saturating_duration_since(start).as_secs();
        }
        self.elapsed_secs
    }

    /// Takes a final reading and stops the clock for good.
    pub fn freeze(&mut self, now: Instant) {
        self.tick(now);
        self.frozen = true;
    }
}
