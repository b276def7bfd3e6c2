//! Core data model types for studyhall.
//!
//! These are the stored-document shapes the grading engine operates on:
//! quiz definitions, their questions, and the raw answers a learner submits.
//! Field renames and aliases track the document-database exports this data
//! comes from, which predate the current field naming.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The kind of a quiz question, dispatching how its answer is compared.
///
/// Stored documents use the strings `"single"`, `"multiple"` (older records
/// say `"multi"`), and `"fill"`. Anything else deserializes to `Unknown`,
/// which grades as always-incorrect instead of failing the whole quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option is correct.
    Single,
    /// A set of options is correct; no partial credit.
    #[serde(alias = "multi")]
    Multiple,
    /// Free-text answer compared against one or more acceptable strings.
    Fill,
    /// Unrecognized kind from a stored document.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => write!(f, "single"),
            QuestionKind::Multiple => write!(f, "multiple"),
            QuestionKind::Fill => write!(f, "fill"),
            QuestionKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "multiple" | "multi" => Ok(QuestionKind::Multiple),
            "fill" => Ok(QuestionKind::Fill),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// An answer key as stored: either a single string or an array of strings.
///
/// Which encoding is meaningful depends on the question kind. Mismatches
/// (a bare string where a multi-choice set is expected, and vice versa) are
/// normalized defensively at grading time rather than rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    One(String),
    Many(Vec<String>),
}

impl Default for KeyValue {
    fn default() -> Self {
        KeyValue::One(String::new())
    }
}

impl KeyValue {
    /// View the key as a list of strings regardless of encoding.
    pub fn as_slice(&self) -> &[String] {
        match self {
            KeyValue::One(value) => std::slice::from_ref(value),
            KeyValue::Many(values) => values,
        }
    }

    /// The single-string form, if that is how the key is stored.
    pub fn as_one(&self) -> Option<&str> {
        match self {
            KeyValue::One(value) => Some(value),
            KeyValue::Many(_) => None,
        }
    }
}

/// One question in a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question kind.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Display text. Opaque to grading.
    #[serde(rename = "question", default)]
    pub prompt: String,
    /// Ordered options for choice questions; empty for fill-in.
    /// The option at index `j` is addressed by letter `j` (A, B, C, ...).
    #[serde(default)]
    pub options: Vec<String>,
    /// The answer key. Stored data mixes two encodings (positional letter
    /// codes and literal option text); the normalizer accepts both.
    #[serde(rename = "answer", default)]
    pub key: KeyValue,
    /// Point value awarded when the question is answered correctly.
    #[serde(rename = "score", default = "default_weight")]
    pub weight: f64,
    /// Difficulty 1-5. Informational: feeds listing badges and history
    /// bucketing, never grading.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

fn default_weight() -> f64 {
    1.0
}

fn default_difficulty() -> u8 {
    3
}

/// An ordered sequence of questions plus a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDefinition {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Questions in display order. Grading indexes into this sequence.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Authoring teacher, when known. Carried for record association only.
    #[serde(default, alias = "teacherId", skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    /// Course this quiz belongs to, when known.
    #[serde(default, alias = "courseId", skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

impl QuizDefinition {
    /// Sum of all question weights (the maximum attainable score).
    pub fn possible(&self) -> f64 {
        self.questions.iter().map(|q| q.weight).sum()
    }

    /// Mean question difficulty, shown as the star badge next to quiz
    /// listings. 0.0 for an empty quiz.
    pub fn average_difficulty(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.questions.iter().map(|q| f64::from(q.difficulty)).sum();
        sum / self.questions.len() as f64
    }

    /// The average difficulty rounded into a 1-5 tier, for bucketing scores
    /// into a learner's difficulty history.
    pub fn tier(&self) -> u8 {
        (self.average_difficulty().round() as u8).clamp(1, 5)
    }
}

/// A learner's raw answer to one question, as captured by the answering UI:
/// a letter or literal option text (single choice), a sequence of those
/// (multi choice), or free text (fill-in). Stored documents do not tag
/// these, so decoding is shape-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Text(String),
    Selection(Vec<String>),
}

impl RawAnswer {
    pub fn text(value: impl Into<String>) -> Self {
        RawAnswer::Text(value.into())
    }

    pub fn selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawAnswer::Selection(values.into_iter().map(Into::into).collect())
    }
}

/// Raw answers keyed by 0-based question index.
///
/// Missing entries denote unanswered questions; grading treats them as
/// incorrect with zero credit, never as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<usize, RawAnswer>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for the question at `index`, replacing any
    /// previous answer.
    pub fn set(&mut self, index: usize, answer: RawAnswer) {
        self.0.insert(index, answer);
    }

    pub fn answer(&self, index: usize) -> Option<&RawAnswer> {
        self.0.get(&index)
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &RawAnswer)> {
        self.0.iter().map(|(&index, answer)| (index, answer))
    }
}

impl FromIterator<(usize, RawAnswer)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (usize, RawAnswer)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_and_parse() {
        assert_eq!(QuestionKind::Single.to_string(), "single");
        assert_eq!(QuestionKind::Multiple.to_string(), "multiple");
        assert_eq!("single".parse::<QuestionKind>().unwrap(), QuestionKind::Single);
        assert_eq!("multiple".parse::<QuestionKind>().unwrap(), QuestionKind::Multiple);
        assert_eq!("multi".parse::<QuestionKind>().unwrap(), QuestionKind::Multiple);
        assert_eq!("Fill".parse::<QuestionKind>().unwrap(), QuestionKind::Fill);
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn kind_unrecognized_deserializes_to_unknown() {
        let kind: QuestionKind = serde_json::from_str("\"essay\"").unwrap();
        assert_eq!(kind, QuestionKind::Unknown);
        let kind: QuestionKind = serde_json::from_str("\"multi\"").unwrap();
        assert_eq!(kind, QuestionKind::Multiple);
    }

    #[test]
    fn question_serde_roundtrip() {
        let question = Question {
            kind: QuestionKind::Single,
            prompt: "Which tag marks a block element?".into(),
            options: vec!["<span>".into(), "<div>".into(), "<a>".into(), "<img>".into()],
            key: KeyValue::One("B".into()),
            weight: 2.0,
            difficulty: 3,
        };
        let json = serde_json::to_string(&question).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, question);
        // stored field names survive the rename mapping
        assert!(json.contains("\"type\":\"single\""));
        assert!(json.contains("\"score\":2.0"));
    }

    #[test]
    fn question_defaults_weight_and_difficulty() {
        let question: Question = serde_json::from_str(
            r#"{"type": "fill", "question": "Capital of France?", "answer": "Paris"}"#,
        )
        .unwrap();
        assert_eq!(question.weight, 1.0);
        assert_eq!(question.difficulty, 3);
        assert!(question.options.is_empty());
    }

    #[test]
    fn key_value_accepts_both_encodings() {
        let one: KeyValue = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(one.as_one(), Some("A"));
        assert_eq!(one.as_slice(), ["A".to_string()].as_slice());

        let many: KeyValue = serde_json::from_str(r#"["A", "C"]"#).unwrap();
        assert_eq!(many.as_one(), None);
        assert_eq!(many.as_slice().len(), 2);
    }

    #[test]
    fn quiz_average_difficulty_and_tier() {
        let mut quiz = QuizDefinition {
            name: "Sample".into(),
            questions: Vec::new(),
            teacher_id: None,
            course_id: None,
        };
        assert_eq!(quiz.average_difficulty(), 0.0);
        assert_eq!(quiz.tier(), 1);

        for difficulty in [2, 3, 5] {
            quiz.questions.push(Question {
                kind: QuestionKind::Fill,
                prompt: String::new(),
                options: Vec::new(),
                key: KeyValue::One("x".into()),
                weight: 1.0,
                difficulty,
            });
        }
        assert!((quiz.average_difficulty() - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(quiz.tier(), 3);
    }

    #[test]
    fn answer_set_indexing() {
        let mut answers = AnswerSet::new();
        answers.set(0, RawAnswer::text("B"));
        answers.set(2, RawAnswer::selection(["A", "C"]));

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.answer(0), Some(&RawAnswer::Text("B".into())));
        assert_eq!(answers.answer(1), None);
        assert!(answers.answer(2).is_some());
    }

    #[test]
    fn answer_set_decodes_from_index_keyed_object() {
        let answers: AnswerSet =
            serde_json::from_str(r#"{"0": "B", "1": ["A", "C"], "3": "42"}"#).unwrap();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers.answer(1), Some(&RawAnswer::selection(["A", "C"])));
        assert_eq!(answers.answer(2), None);
    }
}
