//! Per-question-kind accuracy aggregation.
//!
//! Produces the rows behind the ability radar chart: for one learner, how
//! accurate they are on each question kind across their graded attempts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use studyhall_core::model::QuestionKind;
use studyhall_core::results::AttemptRecord;

/// Accuracy of one learner on one question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAccuracy {
    pub kind: QuestionKind,
    /// Questions of this kind the learner was graded on.
    pub attempted: usize,
    /// Of those, how many were answered correctly.
    pub correct: usize,
    /// Rounded percentage 0-100.
    pub accuracy_pct: u32,
}

/// Aggregate per-kind accuracy across one learner's attempt records.
///
/// Unknown-kind questions are excluded: they grade as incorrect by
/// construction and would only skew the chart. Kinds the learner never saw
/// produce no row.
pub fn type_accuracy(records: &[AttemptRecord]) -> Vec<TypeAccuracy> {
    let mut buckets: BTreeMap<QuestionKind, (usize, usize)> = BTreeMap::new();

    for record in records {
        for verdict in &record.result.verdicts {
            if verdict.kind == QuestionKind::Unknown {
                continue;
            }
            let (attempted, correct) = buckets.entry(verdict.kind).or_default();
            *attempted += 1;
            if verdict.correct {
                *correct += 1;
            }
        }
    }

    buckets
        .into_iter()
        .map(|(kind, (attempted, correct))| TypeAccuracy {
            kind,
            attempted,
            correct,
            accuracy_pct: percentage(correct, attempted),
        })
        .collect()
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyhall_core::engine::grade;
    use studyhall_core::model::{
        AnswerSet, KeyValue, Question, QuizDefinition, RawAnswer,
    };

    fn quiz() -> QuizDefinition {
        QuizDefinition {
            name: "Mixed kinds".into(),
            questions: vec![
                Question {
                    kind: QuestionKind::Single,
                    prompt: "pick one".into(),
                    options: vec!["a".into(), "b".into()],
                    key: KeyValue::One("A".into()),
                    weight: 1.0,
                    difficulty: 3,
                },
                Question {
                    kind: QuestionKind::Multiple,
                    prompt: "pick many".into(),
                    options: vec!["a".into(), "b".into(), "c".into()],
                    key: KeyValue::Many(vec!["A".into(), "B".into()]),
                    weight: 1.0,
                    difficulty: 3,
                },
                Question {
                    kind: QuestionKind::Fill,
                    prompt: "say it".into(),
                    options: Vec::new(),
                    key: KeyValue::One("paris".into()),
                    weight: 1.0,
                    difficulty: 3,
                },
            ],
            teacher_id: None,
            course_id: None,
        }
    }

    fn record(answers: AnswerSet) -> AttemptRecord {
        let quiz = quiz();
        let result = grade(&quiz, &answers);
        AttemptRecord::new("u-1", "Mei", "quiz-1", &quiz, answers, result)
    }

    #[test]
    fn accuracy_counts_per_kind_across_records() {
        let mut all_right = AnswerSet::new();
        all_right.set(0, RawAnswer::text("A"));
        all_right.set(1, RawAnswer::selection(["B", "A"]));
        all_right.set(2, RawAnswer::text("Paris"));

        let mut single_only = AnswerSet::new();
        single_only.set(0, RawAnswer::text("A"));

        let records = vec![record(all_right), record(single_only)];
        let rows = type_accuracy(&records);

        assert_eq!(rows.len(), 3);
        let single = rows.iter().find(|r| r.kind == QuestionKind::Single).unwrap();
        assert_eq!((single.attempted, single.correct, single.accuracy_pct), (2, 2, 100));

        let multi = rows.iter().find(|r| r.kind == QuestionKind::Multiple).unwrap();
        assert_eq!((multi.attempted, multi.correct, multi.accuracy_pct), (2, 1, 50));

        let fill = rows.iter().find(|r| r.kind == QuestionKind::Fill).unwrap();
        assert_eq!((fill.attempted, fill.correct, fill.accuracy_pct), (2, 1, 50));
    }

    #[test]
    fn no_records_produce_no_rows() {
        assert!(type_accuracy(&[]).is_empty());
    }

    #[test]
    fn unknown_kind_questions_are_excluded() {
        let mut quiz = quiz();
        quiz.questions.push(Question {
            kind: QuestionKind::Unknown,
            prompt: "essay".into(),
            options: Vec::new(),
            key: KeyValue::One(String::new()),
            weight: 1.0,
            difficulty: 3,
        });
        let answers = AnswerSet::new();
        let result = grade(&quiz, &answers);
        let record = AttemptRecord::new("u-1", "Mei", "quiz-1", &quiz, answers, result);

        let rows = type_accuracy(&[record]);
        assert!(rows.iter().all(|r| r.kind != QuestionKind::Unknown));
        assert_eq!(rows.len(), 3);
    }
}
