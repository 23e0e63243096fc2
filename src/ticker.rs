use std::time::{Duration, Instant};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A repeating deadline polled by the event loop.
///
/// Holding a `Ticker` is holding the periodic callback; dropping it stops the
/// ticks. Ticks missed while the loop was busy coalesce into one.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn start(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        // stay on the original phase
        let lag = (now - self.next_due).as_nanos() % self.interval.as_nanos();
        self.next_due = now + self.interval - Duration::from_nanos(lag as u64);
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut ticker = Ticker::start(10 * MS, t0);
        assert!(!ticker.poll(t0));
        assert!(!ticker.poll(t0 + 9 * MS));
        assert!(ticker.poll(t0 + 10 * MS));
        assert!(!ticker.poll(t0 + 10 * MS));
        assert!(ticker.poll(t0 + 20 * MS));
    }

    #[test]
    fn missed_ticks_coalesce() {
        let t0 = Instant::now();
        let mut ticker = Ticker::start(10 * MS, t0);
        assert!(ticker.poll(t0 + 55 * MS));
        assert!(!ticker.poll(t0 + 59 * MS));
        assert_eq!(ticker.time_until_due(t0 + 55 * MS), 5 * MS);
        assert!(ticker.poll(t0 + 60 * MS));
    }

    #[test]
    fn zero_interval_is_raised_to_minimum() {
        let t0 = Instant::now();
        let ticker = Ticker::start(Duration::ZERO, t0);
        assert_eq!(ticker.time_until_due(t0), MIN_INTERVAL);
    }

    #[test]
    fn time_until_due_saturates() {
        let t0 = Instant::now();
        let ticker = Ticker::start(10 * MS, t0);
        assert_eq!(ticker.time_until_due(t0), 10 * MS);
        assert_eq!(ticker.time_until_due(t0 + 30 * MS), Duration::ZERO);
    }
}
