use std::time::{Duration, Instant};

/// Trailing-edge debouncer driven by the event loop's clock.
///
/// Every [`call`](Debouncer::call) replaces the pending arguments and pushes
/// the deadline out to `now + delay`. [`poll`](Debouncer::poll) hands back the
/// latest arguments once the deadline has passed, exactly once.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn call(&mut self, args: T, now: Instant) {
        self.pending = Some((now + self.delay, args));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, args)| args),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}
