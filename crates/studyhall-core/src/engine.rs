//! The grading engine.
//!
//! `grade` is a total, pure function over in-memory data: malformed
//! questions and missing answers produce incorrect verdicts, never errors,
//! so one bad stored record cannot abort grading of the rest of a quiz.
//! Persisting the outcome is the caller's job.

use crate::model::{AnswerSet, QuestionKind, QuizDefinition};
use crate::normalize::{normalize, normalize_key, NormalizedAnswer, NormalizedKey};
use crate::results::{ScoreResult, Verdict};

/// Relative tolerance for numeric fill-in comparison, absorbing formatting
/// differences like "3.0" vs "3".
pub const FILL_TOLERANCE: f64 = 0.01;

/// Grade a quiz submission.
///
/// Each question is judged independently against its normalized answer key:
///
/// * `single`: letter equality after normalization;
/// * `multiple`: exact set equality, no partial credit;
/// * `fill`: exact match against any acceptable answer, or numeric match
///   within [`FILL_TOLERANCE`] when both sides parse as numbers.
///
/// The total score is the sum of weights over correct questions. A quiz
/// with zero questions yields score 0 and an empty verdict sequence.
pub fn grade(quiz: &QuizDefinition, answers: &AnswerSet) -> ScoreResult {
    let mut verdicts = Vec::with_capacity(quiz.questions.len());
    let mut total = 0.0;

    for (index, question) in quiz.questions.iter().enumerate() {
        if question.kind == QuestionKind::Unknown {
            tracing::warn!(
                "question {index} has an unrecognized kind, grading as incorrect"
            );
        }

        let user = normalize(question, answers.answer(index));
        let key = normalize_key(question);
        let correct = is_correct(&user, &key);
        if correct {
            total += question.weight;
        }

        verdicts.push(Verdict {
            index,
            kind: question.kind,
            correct,
            weight: question.weight,
            user,
            key,
        });
    }

    ScoreResult { total, verdicts }
}

/// Compare one normalized answer against one normalized key.
///
/// An unanswered question is never correct. A key that normalized to the
/// empty sentinel (unresolvable letter, empty set) can never be matched, so
/// malformed questions grade as incorrect without special-casing. Mismatched
/// shapes (possible only for `Unknown`-kind questions or hand-built values)
/// are incorrect.
fn is_correct(user: &NormalizedAnswer, key: &NormalizedKey) -> bool {
    match (user, key) {
        (NormalizedAnswer::Choice(answer), NormalizedKey::Choice(expected)) => {
            matches!((answer, expected), (Some(a), Some(e)) if a == e)
        }
        (NormalizedAnswer::Choices(answer), NormalizedKey::Choices(expected)) => {
            !expected.is_empty() && answer == expected
        }
        (NormalizedAnswer::Text(answer), NormalizedKey::Texts(acceptable)) => {
            !answer.is_empty() && acceptable.iter().any(|expected| fill_matches(answer, expected))
        }
        _ => false,
    }
}

/// Fill-in comparison: exact match first, then a 1% relative numeric
/// tolerance when both sides parse as numbers. One side numeric and the
/// other not falls back to the exact comparison (already failed here).
fn fill_matches(answer: &str, expected: &str) -> bool {
    if answer == expected {
        return true;
    }
    match (answer.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(e)) => (a - e).abs() / e.abs().max(1.0) < FILL_TOLERANCE,
        _ => false,
    }
}
