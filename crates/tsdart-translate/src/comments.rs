//! Leading comment deduplication.
//!
//! Nodes that share a start position after trivia skipping all report the
//! same leading comments. The tracker remembers the highest comment start
//! already emitted in the current file, so each comment is written once, by
//! the first node visited.

/// Per-file cursor over emitted comment starts.
#[derive(Debug, Default, Clone)]
pub struct CommentTracker {
    cursor: Option<u32>,
}

impl CommentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the comment starting at `pos`.
    ///
    /// Returns `false` if a comment at or after `pos` was already claimed.
    pub fn claim(&mut self, pos: u32) -> bool {
        if self.cursor.is_some_and(|cursor| pos <= cursor) {
            return false;
        }
        self.cursor = Some(pos);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_at_zero() {
        let mut tracker = CommentTracker::new();
        assert!(tracker.claim(0));
        assert!(!tracker.claim(0));
    }

    #[test]
    fn test_cursor_only_moves_forward() {
        let mut tracker = CommentTracker::new();
        assert!(tracker.claim(10));
        assert!(!tracker.claim(4));
        assert!(!tracker.claim(10));
        assert!(tracker.claim(11));
        assert!(!tracker.claim(11));
    }
}
