//! Visit pacing
//!
//! The crawler fetches one page at a time. The scheduler makes sure the
//! starts of two consecutive visits are at least the crawl delay apart,
//! counting the time the previous visit itself took.

use std::time::Duration;
use tokio::time::Instant;

/// Paces visits to a fixed minimum spacing
#[derive(Debug)]
pub struct Scheduler {
    /// Minimum spacing between visit starts
    crawl_delay: Duration,

    /// When the most recent visit started
    last_visit: Option<Instant>,
}

impl Scheduler {
    /// Creates a scheduler that spaces visits by `crawl_delay`
    pub fn new(crawl_delay: Duration) -> Self {
        Self {
            crawl_delay,
            last_visit: None,
        }
    }

    /// Time still to wait at `now` before the next visit may start
    ///
    /// Zero before the first visit and once the previous visit has taken at
    /// least the crawl delay.
    pub fn remaining_delay(&self, now: Instant) -> Duration {
        match self.last_visit {
            Some(started) => self
                .crawl_delay
                .saturating_sub(now.saturating_duration_since(started)),
            None => Duration::ZERO,
        }
    }

    /// Waits until the next visit may start, then marks it as started
    pub async fn wait_turn(&mut self) {
        let remaining = self.remaining_delay(Instant::now());
        if !remaining.is_zero() {
            tracing::trace!("Waiting {:?} before next visit", remaining);
            if let Some(started) = self.last_visit {
                tokio::time::sleep_until(started + self.crawl_delay).await;
            }
        }
        self.last_visit = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delay_before_first_visit() {
        let scheduler = Scheduler::new(Duration::from_millis(100));
        assert_eq!(scheduler.remaining_delay(Instant::now()), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_remaining_delay_counts_visit_time() {
        let mut scheduler = Scheduler::new(Duration::from_millis(100));
        scheduler.wait_turn().await;
        let started = scheduler.last_visit.unwrap();

        assert_eq!(
            scheduler.remaining_delay(started + Duration::from_millis(30)),
            Duration::from_millis(70)
        );
        assert_eq!(
            scheduler.remaining_delay(started + Duration::from_millis(100)),
            Duration::ZERO
        );
        assert_eq!(
            scheduler.remaining_delay(started + Duration::from_millis(250)),
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn test_consecutive_turns_are_spaced() {
        let mut scheduler = Scheduler::new(Duration::from_millis(50));

        let begin = Instant::now();
        scheduler.wait_turn().await;
        scheduler.wait_turn().await;
        scheduler.wait_turn().await;

        assert!(begin.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_zero_delay_never_waits() {
        let mut scheduler = Scheduler::new(Duration::ZERO);
        scheduler.wait_turn().await;
        assert_eq!(scheduler.remaining_delay(Instant::now()), Duration::ZERO);
    }
}
