//! Possession history used for assist credit.
use smallvec::SmallVec;

use crate::roster::CompetitorId;

/// Distinct consecutive possessors since the last stoppage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PossessionTracker {
    history: SmallVec<[CompetitorId; 8]>,
}

impl PossessionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a possession; repeating the current possessor is a no-op.
    pub fn push(&mut self, competitor: CompetitorId) {
        if self.top() != Some(competitor) {
            self.history.push(competitor);
        }
    }

    /// Second-to-last possessor, if there have been at least two.
    #[must_use]
    pub fn assist(&self) -> Option<CompetitorId> {
        let len = self.history.len();
        if len > 1 {
            Some(self.history[len - 2])
        } else {
            None
        }
    }

    #[must_use]
    pub fn top(&self) -> Option<CompetitorId> {
        self.history.last().copied()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_has_no_assist() {
        let tracker = PossessionTracker::new();
        assert_eq!(tracker.assist(), None);
        assert_eq!(tracker.len(), 0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn single_possession_has_no_assist() {
        let mut tracker = PossessionTracker::new();
        tracker.push(CompetitorId(1));
        assert_eq!(tracker.assist(), None);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn assist_is_second_to_last() {
        let mut tracker = PossessionTracker::new();
        tracker.push(CompetitorId(1));
        tracker.push(CompetitorId(2));
        assert_eq!(tracker.assist(), Some(CompetitorId(1)));
        tracker.push(CompetitorId(3));
        assert_eq!(tracker.assist(), Some(CompetitorId(2)));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn repeating_top_is_noop() {
        let mut tracker = PossessionTracker::new();
        tracker.push(CompetitorId(1));
        tracker.push(CompetitorId(2));
        tracker.push(CompetitorId(2));
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.assist(), Some(CompetitorId(1)));

        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.top(), None);
    }
}
