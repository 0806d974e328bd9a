//! Visible countdown.
//!
//! Purely cosmetic: it may disagree with the tension engine's deadline and
//! never kills anyone.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    duration_ms: u64,
    started_at_ms: Option<u64>,
}

impl Countdown {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started_at_ms: None,
        }
    }

    /// Starting an already running countdown keeps the first start time.
    pub fn start(&mut self, now_ms: u64) {
        self.started_at_ms.get_or_insert(now_ms);
    }

    pub fn is_started(&self) -> bool {
        self.started_at_ms.is_some()
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            Some(start) => self
                .duration_ms
                .saturating_sub(now_ms.saturating_sub(start)),
            None => self.duration_ms,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.is_started() && self.remaining_ms(now_ms) == 0
    }

    /// `M:SS`, seconds rounded up so `0:00` only shows at expiry.
    pub fn display(&self, now_ms: u64) -> String {
        let secs = self.remaining_ms(now_ms).div_ceil(1_000);
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_full_duration_before_start() {
        let c = Countdown::new(90_000);
        assert_eq!(c.display(50_000), "1:30");
        assert!(!c.is_expired(1_000_000));
    }

    #[test]
    fn counts_down_from_start() {
        let mut c = Countdown::new(90_000);
        c.start(1_000);
        assert_eq!(c.display(1_000), "1:30");
        assert_eq!(c.display(1_001), "1:30");
        assert_eq!(c.display(2_000), "1:29");
        assert_eq!(c.display(90_500), "0:01");
        assert_eq!(c.display(91_000), "0:00");
        assert!(c.is_expired(91_000));
    }

    #[test]
    fn second_start_is_ignored() {
        let mut c = Countdown::new(10_000);
        c.start(0);
        c.start(5_000);
        assert_eq!(c.remaining_ms(5_000), 5_000);
    }
}
