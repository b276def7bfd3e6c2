//! Grading outcomes and the immutable attempt record.
//!
//! A [`ScoreResult`] is what the engine hands back; an [`AttemptRecord`]
//! wraps it with identity and time for storage as one (learner, quiz,
//! timestamp) row. Records are never mutated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerSet, QuestionKind, QuizDefinition};
use crate::normalize::{NormalizedAnswer, NormalizedKey};

/// Per-question grading outcome, parallel to the quiz's question sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// 0-based index of the question this verdict belongs to.
    pub index: usize,
    /// Question kind, for per-type accuracy aggregation downstream.
    pub kind: QuestionKind,
    pub correct: bool,
    /// The question's point value (awarded only when correct).
    pub weight: f64,
    /// The learner's answer in canonical form, for review display.
    pub user: NormalizedAnswer,
    /// The answer key in canonical form.
    pub key: NormalizedKey,
}

/// The outcome of grading one quiz submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Sum of weights over correctly answered questions.
    pub total: f64,
    /// One verdict per question, in quiz order.
    pub verdicts: Vec<Verdict>,
}

impl ScoreResult {
    /// Sum of all question weights (the maximum attainable score).
    pub fn possible(&self) -> f64 {
        self.verdicts.iter().map(|v| v.weight).sum()
    }

    /// Number of correctly answered questions.
    pub fn correct_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.correct).count()
    }

    /// Weighted correctness rate as a 0-100 percentage; 0 for an empty
    /// quiz. This is the quantity the difficulty recommender consumes.
    pub fn percent(&self) -> f64 {
        let possible = self.possible();
        if possible <= 0.0 {
            return 0.0;
        }
        self.total / possible * 100.0
    }
}

/// An immutable record of one graded attempt.
///
/// The surrounding application persists these and later feeds them back
/// into analytics and the difficulty recommender. Learner identity is
/// explicit context here, never ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Unique record identifier.
    pub id: Uuid,
    pub learner_id: String,
    /// Display name captured at submission time.
    pub learner_name: String,
    pub quiz_id: String,
    pub quiz_name: String,
    /// Difficulty tier (1-5) of the quiz this score was recorded against.
    pub tier: u8,
    /// The raw answers as submitted, kept for later review.
    pub answers: AnswerSet,
    /// The grading outcome.
    pub result: ScoreResult,
    pub created_at: DateTime<Utc>,
}

impl AttemptRecord {
    /// Build the record for a just-graded submission.
    pub fn new(
        learner_id: impl Into<String>,
        learner_name: impl Into<String>,
        quiz_id: impl Into<String>,
        quiz: &QuizDefinition,
        answers: AnswerSet,
        result: ScoreResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner_id: learner_id.into(),
            learner_name: learner_name.into(),
            quiz_id: quiz_id.into(),
            quiz_name: quiz.name.clone(),
            tier: quiz.tier(),
            answers,
            result,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grade;
    use crate::model::{KeyValue, Question, RawAnswer};

    fn sample_quiz() -> QuizDefinition {
        QuizDefinition {
            name: "HTML basics".into(),
            questions: vec![
                Question {
                    kind: QuestionKind::Single,
                    prompt: "Block element?".into(),
                    options: vec!["<span>".into(), "<div>".into()],
                    key: KeyValue::One("B".into()),
                    weight: 3.0,
                    difficulty: 4,
                },
                Question {
                    kind: QuestionKind::Fill,
                    prompt: "Answer to everything?".into(),
                    options: Vec::new(),
                    key: KeyValue::One("42".into()),
                    weight: 1.0,
                    difficulty: 2,
                },
            ],
            teacher_id: Some("t-1".into()),
            course_id: None,
        }
    }

    #[test]
    fn percent_is_weighted() {
        let quiz = sample_quiz();
        let mut answers = AnswerSet::new();
        answers.set(0, RawAnswer::text("B"));

        let result = grade(&quiz, &answers);
        assert_eq!(result.total, 3.0);
        assert_eq!(result.possible(), 4.0);
        assert_eq!(result.correct_count(), 1);
        assert_eq!(result.percent(), 75.0);
    }

    #[test]
    fn percent_of_empty_result_is_zero() {
        let result = ScoreResult {
            total: 0.0,
            verdicts: Vec::new(),
        };
        assert_eq!(result.percent(), 0.0);
        assert_eq!(result.possible(), 0.0);
    }

    #[test]
    fn attempt_record_captures_quiz_context() {
        let quiz = sample_quiz();
        let mut answers = AnswerSet::new();
        answers.set(0, RawAnswer::text("B"));
        answers.set(1, RawAnswer::text("42.0"));

        let result = grade(&quiz, &answers);
        let record = AttemptRecord::new("u-7", "Mei", "quiz-1", &quiz, answers, result);

        assert_eq!(record.quiz_name, "HTML basics");
        assert_eq!(record.tier, 3);
        assert_eq!(record.result.total, 4.0);
        assert_eq!(record.answers.len(), 2);
    }

    #[test]
    fn attempt_record_serde_roundtrip() {
        let quiz = sample_quiz();
        let answers = AnswerSet::new();
        let result = grade(&quiz, &answers);
        let record = AttemptRecord::new("u-7", "Mei", "quiz-1", &quiz, answers, result);

        let json = serde_json::to_string(&record).unwrap();
        let back: AttemptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
