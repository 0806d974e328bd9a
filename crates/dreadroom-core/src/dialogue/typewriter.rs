/// Reveals a line one character per interval, then closes after a delay.
///
/// Pure function of time: the caller asks what is visible at `now_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: String,
    char_count: usize,
    started_at_ms: u64,
    char_interval_ms: u64,
    close_delay_ms: u64,
}

impl Typewriter {
    pub fn start(text: impl Into<String>, char_interval_ms: u64, close_delay_ms: u64, now_ms: u64) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            started_at_ms: now_ms,
            char_interval_ms,
            close_delay_ms,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Characters shown at `now_ms`. The first one appears immediately.
    pub fn visible_chars(&self, now_ms: u64) -> usize {
        if now_ms < self.started_at_ms || self.char_count == 0 {
            return 0;
        }
        if self.char_interval_ms == 0 {
            return self.char_count;
        }
        let steps = (now_ms - self.started_at_ms) / self.char_interval_ms + 1;
        usize::try_from(steps).map_or(self.char_count, |n| n.min(self.char_count))
    }

    pub fn visible(&self, now_ms: u64) -> &str {
        let n = self.visible_chars(now_ms);
        match self.text.char_indices().nth(n) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    /// When the reveal finishes (one interval after the last character).
    pub fn completes_at(&self) -> u64 {
        let chars = u64::try_from(self.char_count).unwrap_or(u64::MAX);
        self.started_at_ms
            .saturating_add(chars.saturating_mul(self.char_interval_ms))
    }

    pub fn is_complete(&self, now_ms: u64) -> bool {
        now_ms >= self.completes_at()
    }

    /// Auto-close time. A dead player's last line stays up.
    pub fn close_at(&self, dead: bool) -> Option<u64> {
        if dead {
            None
        } else {
            Some(self.completes_at().saturating_add(self.close_delay_ms))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_char_per_interval() {
        let t = Typewriter::start("abc", 20, 1_000, 100);
        assert_eq!(t.visible(99), "");
        assert_eq!(t.visible(100), "a");
        assert_eq!(t.visible(119), "a");
        assert_eq!(t.visible(120), "ab");
        assert_eq!(t.visible(140), "abc");
        assert_eq!(t.visible(10_000), "abc");
    }

    #[test]
    fn closes_after_delay_unless_dead() {
        let t = Typewriter::start("abc", 20, 1_000, 100);
        assert_eq!(t.completes_at(), 160);
        assert!(!t.is_complete(159));
        assert!(t.is_complete(160));
        assert_eq!(t.close_at(false), Some(1_160));
        assert_eq!(t.close_at(true), None);
    }

    #[test]
    fn slices_on_char_boundaries() {
        let t = Typewriter::start("…ok", 10, 0, 0);
        assert_eq!(t.visible(0), "…");
        assert_eq!(t.visible(10), "…o");
    }

    #[test]
    fn empty_line_closes_after_delay() {
        let t = Typewriter::start("", 20, 1_000, 50);
        assert_eq!(t.visible(50), "");
        assert_eq!(t.close_at(false), Some(1_050));
    }
}
