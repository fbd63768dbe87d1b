use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Spaces admissions by a fixed interval.
///
/// Callers wait in turn: the gate is held while sleeping, so at most one
/// admission happens per interval no matter how many workers are waiting.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until the interval since the previous admission has passed.
    /// The first admission is immediate.
    pub async fn admit(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
