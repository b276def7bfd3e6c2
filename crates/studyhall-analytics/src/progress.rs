//! Learner progress summaries over attempt records.
//!
//! The score series feeds the per-quiz bar chart; the tier breakdown and
//! [`ProgressSummary`] feed the "where should this learner go next" view,
//! including the recommended difficulty tier.

use serde::{Deserialize, Serialize};

use studyhall_core::recommend::{
    recommend_with, DifficultyHistory, RecommenderConfig, MAX_TIER, MIN_TIER,
};
use studyhall_core::results::AttemptRecord;

use crate::accuracy::{type_accuracy, TypeAccuracy};

/// One attempt reduced to chart form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub quiz_name: String,
    /// Points earned.
    pub score: f64,
    /// Weighted correctness rate 0-100.
    pub percent: f64,
}

/// Chronological (quiz, score) rows for one learner's score chart.
///
/// Records are sorted by their timestamps; attempts against unnamed quizzes
/// get a positional fallback label.
pub fn score_series(records: &[AttemptRecord]) -> Vec<ScorePoint> {
    let mut ordered: Vec<&AttemptRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.created_at);

    ordered
        .iter()
        .enumerate()
        .map(|(i, record)| ScorePoint {
            quiz_name: if record.quiz_name.is_empty() {
                format!("quiz {}", i + 1)
            } else {
                record.quiz_name.clone()
            },
            score: record.result.total,
            percent: record.result.percent(),
        })
        .collect()
}

/// Aggregate over one learner's attempts at one difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub tier: u8,
    pub attempts: usize,
    /// Mean percentage score across all attempts at this tier.
    pub average_percent: f64,
    /// Whether the most recent attempts at this tier meet the promotion
    /// streak.
    pub streak_met: bool,
}

/// Per-tier breakdown with the default recommender configuration.
pub fn tier_breakdown(records: &[AttemptRecord]) -> Vec<TierStats> {
    tier_breakdown_with(records, &RecommenderConfig::default())
}

/// Per-tier breakdown of a learner's history. Tiers without attempts are
/// omitted.
pub fn tier_breakdown_with(
    records: &[AttemptRecord],
    config: &RecommenderConfig,
) -> Vec<TierStats> {
    let history = DifficultyHistory::from_records(records);
    let mut stats = Vec::new();

    for tier in MIN_TIER..=MAX_TIER {
        let scores = history.scores(tier);
        if scores.is_empty() {
            continue;
        }
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let streak_met = scores.len() >= config.promotion_streak
            && scores[scores.len() - config.promotion_streak..]
                .iter()
                .all(|&score| score >= config.promotion_threshold);
        stats.push(TierStats {
            tier,
            attempts: scores.len(),
            average_percent: average,
            streak_met,
        });
    }

    stats
}

/// A learner's progress snapshot: score series, per-tier stats, per-kind
/// accuracy, and the recommended next difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub learner_id: String,
    pub attempts: usize,
    pub scores: Vec<ScorePoint>,
    pub tiers: Vec<TierStats>,
    pub accuracy: Vec<TypeAccuracy>,
    pub recommended_tier: u8,
}

impl ProgressSummary {
    /// Build a snapshot from one learner's records (as returned by the
    /// persistence layer, chronological). Records belonging to other
    /// learners are filtered out.
    pub fn build(learner_id: &str, records: &[AttemptRecord]) -> Self {
        Self::build_with(learner_id, records, &RecommenderConfig::default())
    }

    pub fn build_with(
        learner_id: &str,
        records: &[AttemptRecord],
        config: &RecommenderConfig,
    ) -> Self {
        let own: Vec<AttemptRecord> = records
            .iter()
            .filter(|record| record.learner_id == learner_id)
            .cloned()
            .collect();

        let history = DifficultyHistory::from_records(&own);

        Self {
            learner_id: learner_id.to_string(),
            attempts: own.len(),
            scores: score_series(&own),
            tiers: tier_breakdown_with(&own, config),
            accuracy: type_accuracy(&own),
            recommended_tier: recommend_with(&history, config),
        }
    }

    /// Format the summary as markdown for reports and review threads.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**{}:** {} attempts, recommended difficulty tier {}\n\n",
            self.learner_id, self.attempts, self.recommended_tier
        ));

        if !self.tiers.is_empty() {
            md.push_str("### Tiers\n\n");
            md.push_str("| Tier | Attempts | Avg % | Streak |\n");
            md.push_str("|------|----------|-------|--------|\n");
            for tier in &self.tiers {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {} |\n",
                    tier.tier,
                    tier.attempts,
                    tier.average_percent,
                    if tier.streak_met { "yes" } else { "no" }
                ));
            }
            md.push('\n');
        }

        if !self.accuracy.is_empty() {
            md.push_str("### Accuracy by question kind\n\n");
            md.push_str("| Kind | Attempted | Correct | Accuracy |\n");
            md.push_str("|------|-----------|---------|----------|\n");
            for row in &self.accuracy {
                md.push_str(&format!(
                    "| {} | {} | {} | {}% |\n",
                    row.kind, row.attempted, row.correct, row.accuracy_pct
                ));
            }
        }

        md
    }
}
