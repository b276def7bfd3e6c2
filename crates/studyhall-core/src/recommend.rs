//! Streak-based difficulty recommendation.
//!
//! A heuristic, not an adaptive-testing algorithm: there is no item-response
//! model and no confidence bound. A learner whose three most recent attempts
//! at a tier all reach 80% is recommended one tier up. The quiz-listing
//! layer uses the recommended tier to prioritize and badge quizzes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::results::AttemptRecord;

/// Lowest difficulty tier.
pub const MIN_TIER: u8 = 1;
/// Highest difficulty tier.
pub const MAX_TIER: u8 = 5;
/// Tier recommended when no history qualifies.
pub const DEFAULT_TIER: u8 = 2;
/// Minimum percentage score for an attempt to count toward a streak.
pub const PROMOTION_THRESHOLD: f64 = 80.0;
/// Consecutive qualifying attempts required for a promotion.
pub const PROMOTION_STREAK: usize = 3;

/// Knobs for the promotion heuristic.
///
/// The defaults are the production values; tests and the embedding
/// application can tighten or loosen them without forking the scan loop.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Minimum percentage score for an attempt to count toward a streak.
    pub promotion_threshold: f64,
    /// Number of most-recent attempts at a tier that must all qualify.
    pub promotion_streak: usize,
    /// Recommendation when no tier qualifies.
    pub default_tier: u8,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: PROMOTION_THRESHOLD,
            promotion_streak: PROMOTION_STREAK,
            default_tier: DEFAULT_TIER,
        }
    }
}

/// Past percentage scores (0-100) grouped by difficulty tier, chronological
/// within each tier, for one learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyHistory {
    scores: BTreeMap<u8, Vec<f64>>,
}

impl DifficultyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt's percentage score against a tier. Scores against
    /// tiers outside 1-5 are ignored.
    pub fn record(&mut self, tier: u8, percent: f64) {
        if !(MIN_TIER..=MAX_TIER).contains(&tier) {
            tracing::warn!("ignoring score recorded against out-of-range tier {tier}");
            return;
        }
        self.scores.entry(tier).or_default().push(percent);
    }

    /// Build a history from (tier, percent) pairs in chronological order.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (u8, f64)>,
    {
        let mut history = Self::new();
        for (tier, percent) in scores {
            history.record(tier, percent);
        }
        history
    }

    /// Build a history from a learner's stored attempt records.
    ///
    /// Records must be in chronological order (the order the persistence
    /// layer returns them in).
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttemptRecord>,
    {
        Self::from_scores(
            records
                .into_iter()
                .map(|record| (record.tier, record.result.percent())),
        )
    }

    /// Scores recorded against `tier`, oldest first.
    pub fn scores(&self, tier: u8) -> &[f64] {
        self.scores.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of recorded attempts.
    pub fn len(&self) -> usize {
        self.scores.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.values().all(Vec::is_empty)
    }
}

/// Recommend the next difficulty tier with the default configuration.
pub fn recommend(history: &DifficultyHistory) -> u8 {
    recommend_with(history, &RecommenderConfig::default())
}

/// Recommend the next difficulty tier.
///
/// Scans tiers 1 through 5 in ascending order. Every tier whose most recent
/// `promotion_streak` scores all reach `promotion_threshold` overwrites the
/// running recommendation with `min(5, tier + 1)`. The scan deliberately
/// does not stop at the first qualifying tier, so the highest tier where
/// mastery was just demonstrated wins.
pub fn recommend_with(history: &DifficultyHistory, config: &RecommenderConfig) -> u8 {
    let mut recommended = config.default_tier;

    for tier in MIN_TIER..=MAX_TIER {
        let scores = history.scores(tier);
        if scores.len() < config.promotion_streak {
            continue;
        }
        let recent = &scores[scores.len() - config.promotion_streak..];
        if recent.iter().all(|&score| score >= config.promotion_threshold) {
            recommended = (tier + 1).min(MAX_TIER);
            tracing::debug!(
                "streak met at tier {tier}, recommending tier {recommended}"
            );
        }
    }

    recommended
}
