//! Deadline checks on a wrapping millisecond clock

/// Fixed-period deadline
///
/// Fires when at least `period_ms` have elapsed since it last fired.
/// Elapsed time is computed with wrapping arithmetic, so the check
/// survives the 32-bit millisecond counter rolling over (~49.7 days).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_ms: u32,
    last_ms: u32,
}

impl Interval {
    /// Create an interval whose first period starts at `start_ms`
    pub const fn new(period_ms: u32, start_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: start_ms,
        }
    }

    /// Period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Milliseconds elapsed since the interval last fired
    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_ms)
    }

    /// Check the deadline, restarting the period if it has passed
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.elapsed(now_ms) >= self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Restart the period at `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_period() {
        let mut interval = Interval::new(1000, 0);
        assert!(!interval.poll(0));
        assert!(!interval.poll(999));
        assert!(interval.poll(1000));
        assert!(!interval.poll(1500));
        assert!(interval.poll(2000));
    }

    #[test]
    fn test_late_poll_restarts_from_now() {
        let mut interval = Interval::new(500, 0);
        assert!(interval.poll(1700));
        assert!(!interval.poll(2100));
        assert!(interval.poll(2200));
    }

    #[test]
    fn test_wraparound() {
        let start = u32::MAX - 200;
        let mut interval = Interval::new(500, start);
        assert!(!interval.poll(u32::MAX));
        assert!(!interval.poll(100)); // 301 ms elapsed
        assert!(interval.poll(299)); // 500 ms elapsed
    }

    #[test]
    fn test_reset() {
        let mut interval = Interval::new(100, 0);
        interval.reset(80);
        assert!(!interval.poll(150));
        assert!(interval.poll(180));
    }
}
