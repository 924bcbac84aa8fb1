//! High score leaderboard
//!
//! Tracks the top 10 scores, highest first.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    scores: Vec<u64>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build from arbitrary scores: sorted descending, trimmed to the top 10
    pub fn from_scores(scores: impl IntoIterator<Item = u64>) -> Self {
        let mut scores: Vec<u64> = scores.into_iter().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().map(|&low| score > low).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.scores.iter().position(|&s| score > s);
        Some(rank.unwrap_or(self.scores.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't.
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.scores.insert(rank - 1, score);
        self.scores.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.scores.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_descending_order() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score(100), Some(1));
        assert_eq!(board.add_score(300), Some(1));
        assert_eq!(board.add_score(200), Some(2));
        assert_eq!(board.add_score(200), Some(3));
        assert_eq!(board.scores(), &[300, 200, 200, 100]);
        assert_eq!(board.top_score(), Some(300));
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let mut board = HighScores::from_scores((1..=10).map(|n| n * 10));
        assert!(!board.qualifies(10));
        assert_eq!(board.add_score(5), None);
        assert_eq!(board.add_score(55), Some(6));
        assert_eq!(board.scores().len(), MAX_HIGH_SCORES);
        assert_eq!(board.scores().last(), Some(&20));
    }

    #[test]
    fn test_zero_scores_are_recorded() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score(0), Some(1));
        assert!(!board.is_empty());
    }

    #[test]
    fn test_eleven_scores_keep_top_ten() {
        let mut board = HighScores::new();
        for score in [50, 10, 990, 300, 70, 300, 5, 880, 120, 640, 1] {
            board.add_score(score);
        }
        assert_eq!(
            board.scores(),
            &[990, 880, 640, 300, 300, 120, 70, 50, 10, 5]
        );
    }
}
