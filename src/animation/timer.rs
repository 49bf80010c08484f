//! Cooperative fixed-interval timer.
//!
//! Nothing runs in the background: the owner feeds elapsed time through
//! [`Timer::advance`] from its own event loop and acts on the returned tick
//! count.

use std::time::Duration;

use crate::common::{PathfindingError, PathfindingResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl Timer {
    pub fn new(interval: Duration) -> PathfindingResult<Self> {
        check_interval(interval)?;
        Ok(Self {
            interval,
            elapsed: Duration::ZERO,
            running: false,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) -> PathfindingResult<()> {
        check_interval(interval)?;
        self.interval = interval;
        Ok(())
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed `dt` and return the number of whole ticks now due.
    /// The remainder carries over to the next call.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += dt;
        let due = self.elapsed.as_nanos() / self.interval.as_nanos();
        let due = due.min(u32::MAX as u128) as u32;
        self.elapsed -= self.interval * due;
        due
    }
}

fn check_interval(interval: Duration) -> PathfindingResult<()> {
    if interval.is_zero() {
        return Err(PathfindingError::InvalidParameter(
            "timer interval must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Timer::new(Duration::ZERO).is_err());
        let mut timer = Timer::new(Duration::from_millis(5)).unwrap();
        assert!(timer.set_interval(Duration::ZERO).is_err());
        assert_eq!(timer.interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timer = Timer::new(Duration::from_millis(10)).unwrap();
        assert_eq!(timer.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut timer = Timer::new(Duration::from_millis(10)).unwrap();
        timer.start();
        assert_eq!(timer.advance(Duration::from_millis(25)), 2);
        assert_eq!(timer.advance(Duration::from_millis(4)), 0);
        assert_eq!(timer.advance(Duration::from_millis(1)), 1);
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.advance(Duration::from_millis(100)), 0);
    }
}
