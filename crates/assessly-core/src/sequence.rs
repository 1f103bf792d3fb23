use std::fmt;

/// Identifies one accepted submission. Later submissions get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out request tokens and answers whether a token is still the latest.
///
/// Only the completion carrying the latest token may touch the view; anything
/// older lost the race to a newer submission and is dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Supersede every outstanding token without issuing a usable one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue();
        let b = tracker.issue();
        assert!(b > a);
        assert_eq!(a.value() + 1, b.value());
    }

    #[test]
    fn only_newest_is_latest() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue();
        assert!(tracker.is_latest(a));
        let b = tracker.issue();
        assert!(!tracker.is_latest(a));
        assert!(tracker.is_latest(b));
    }

    #[test]
    fn invalidate_supersedes_outstanding() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.is_latest(a));
    }
}
