use std::num::NonZeroUsize;

use lru::LruCache;

/// Last message seen per target, for suppressing back-to-back repeats.
///
/// Only the immediately preceding message counts: `a, b, a` shows all three.
/// Bounded so that hosts minting many targets cannot grow it without limit;
/// the least recently notified target is forgotten first.
#[derive(Debug)]
pub struct DedupGuard {
    last: LruCache<String, String>,
}

impl DedupGuard {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            last: LruCache::new(capacity),
        }
    }

    /// Returns `true` when `message` repeats the previous one for `target`.
    ///
    /// Otherwise records it as the latest. Does nothing when disabled.
    pub fn should_suppress(&mut self, target: &str, message: &str, enabled: bool) -> bool {
        if !enabled {
            return false;
        }
        if self.last.get(target).is_some_and(|previous| previous == message) {
            return true;
        }
        self.last.put(target.to_string(), message.to_string());
        false
    }

    pub fn forget(&mut self, target: &str) {
        self.last.pop(target);
    }

    pub fn reset(&mut self) {
        self.last.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::DedupGuard;
    use std::num::NonZeroUsize;

    fn guard(capacity: usize) -> DedupGuard {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => DedupGuard::new(capacity),
            None => panic!("capacity must be non-zero"),
        }
    }

    #[test]
    fn suppresses_only_immediate_repeats() {
        let mut dedup = guard(8);
        assert!(!dedup.should_suppress("body", "a", true));
        assert!(dedup.should_suppress("body", "a", true));
        assert!(!dedup.should_suppress("body", "b", true));
        assert!(!dedup.should_suppress("body", "a", true));
    }

    #[test]
    fn targets_are_independent() {
        let mut dedup = guard(8);
        assert!(!dedup.should_suppress("body", "a", true));
        assert!(!dedup.should_suppress(".panel", "a", true));
        assert!(dedup.should_suppress(".panel", "a", true));
    }

    #[test]
    fn disabled_guard_records_nothing() {
        let mut dedup = guard(8);
        assert!(!dedup.should_suppress("body", "a", false));
        assert!(dedup.is_empty());
        assert!(!dedup.should_suppress("body", "a", true));
    }

    #[test]
    fn forget_and_reset_clear_records() {
        let mut dedup = guard(8);
        dedup.should_suppress("body", "a", true);
        dedup.should_suppress(".panel", "b", true);
        dedup.forget("body");
        assert!(!dedup.should_suppress("body", "a", true));
        dedup.reset();
        assert!(!dedup.should_suppress(".panel", "b", true));
    }

    #[test]
    fn least_recent_target_is_evicted() {
        let mut dedup = guard(1);
        dedup.should_suppress("body", "a", true);
        dedup.should_suppress(".panel", "a", true);
        assert_eq!(dedup.len(), 1);
        assert!(!dedup.should_suppress("body", "a", true));
    }
}
