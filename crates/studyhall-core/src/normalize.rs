//! Answer normalization.
//!
//! Historical quiz data mixes two answer encodings: positional letter codes
//! (`"B"`) and literal option text (`"<div>"`). Normalization resolves
//! either shape into one canonical comparable form, so grading never has to
//! care which encoding a record or an answer key was written in.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{KeyValue, Question, QuestionKind, RawAnswer};

/// A raw answer reduced to its canonical comparable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedAnswer {
    /// Resolved single-choice letter; `None` when unanswered or unresolvable.
    Choice(Option<char>),
    /// Resolved multi-choice letters. The set collapses duplicates and makes
    /// comparison order-independent; `BTreeSet` keeps display in ascending
    /// letter order.
    Choices(BTreeSet<char>),
    /// Trimmed, lower-cased fill-in text. Empty means unanswered.
    Text(String),
}

impl NormalizedAnswer {
    /// Whether the learner supplied anything usable at all.
    pub fn is_answered(&self) -> bool {
        match self {
            NormalizedAnswer::Choice(letter) => letter.is_some(),
            NormalizedAnswer::Choices(letters) => !letters.is_empty(),
            NormalizedAnswer::Text(text) => !text.is_empty(),
        }
    }
}

impl fmt::Display for NormalizedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedAnswer::Choice(Some(letter)) => write!(f, "{letter}"),
            NormalizedAnswer::Choice(None) => Ok(()),
            NormalizedAnswer::Choices(letters) => {
                let mut first = true;
                for letter in letters {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{letter}")?;
                    first = false;
                }
                Ok(())
            }
            NormalizedAnswer::Text(text) => write!(f, "{text}"),
        }
    }
}

/// The answer key reduced to the same canonical space as learner answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedKey {
    /// Single-choice key letter; `None` when the stored key resolves to no
    /// option. Such a question can never be graded correct.
    Choice(Option<char>),
    /// Multi-choice key letters. Empty means malformed.
    Choices(BTreeSet<char>),
    /// Acceptable fill-in answers, each trimmed + lower-cased. An answer is
    /// correct when it matches any of them.
    Texts(Vec<String>),
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedKey::Choice(Some(letter)) => write!(f, "{letter}"),
            NormalizedKey::Choice(None) => Ok(()),
            NormalizedKey::Choices(letters) => {
                let mut first = true;
                for letter in letters {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{letter}")?;
                    first = false;
                }
                Ok(())
            }
            NormalizedKey::Texts(texts) => write!(f, "{}", texts.join(" | ")),
        }
    }
}

/// The letter addressing option index `j` (0 maps to 'A').
///
/// Callers must keep `index` below 26; option lists longer than the letter
/// alphabet are flagged at authoring time.
pub fn letter(index: usize) -> char {
    debug_assert!(index < 26);
    (b'A' + index as u8) as char
}

/// Resolve one raw choice value to its option letter.
///
/// A single ASCII uppercase letter within the option range passes through
/// unchanged. Anything else is treated as literal option text and resolved
/// to the letter of its first exactly-matching option. Unresolvable values
/// collapse to `None` (unanswered).
pub fn resolve_choice(options: &[String], raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() && (c as usize - 'A' as usize) < options.len() {
            return Some(c);
        }
    }
    options
        .iter()
        .position(|option| option == raw)
        .filter(|&index| index < 26)
        .map(letter)
}

/// Resolve a sequence of raw choice values element-wise, dropping anything
/// unresolvable and collapsing duplicates.
pub fn resolve_choice_set(options: &[String], raw: &[String]) -> BTreeSet<char> {
    raw.iter()
        .filter_map(|value| resolve_choice(options, value))
        .collect()
}

/// Canonical comparable form of a fill-in value: trimmed and lower-cased.
pub fn normalize_fill(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonicalize a learner's raw answer for `question`.
///
/// `None` means unanswered. A raw value whose shape does not match the
/// question kind (a list where one choice is expected, or the reverse)
/// normalizes to the unanswered sentinel rather than erroring.
pub fn normalize(question: &Question, raw: Option<&RawAnswer>) -> NormalizedAnswer {
    match question.kind {
        QuestionKind::Single => {
            let resolved = match raw {
                Some(RawAnswer::Text(value)) => resolve_choice(&question.options, value),
                _ => None,
            };
            NormalizedAnswer::Choice(resolved)
        }
        QuestionKind::Multiple => {
            let resolved = match raw {
                Some(RawAnswer::Selection(values)) => {
                    resolve_choice_set(&question.options, values)
                }
                _ => BTreeSet::new(),
            };
            NormalizedAnswer::Choices(resolved)
        }
        QuestionKind::Fill | QuestionKind::Unknown => {
            let text = match raw {
                Some(RawAnswer::Text(value)) => normalize_fill(value),
                _ => String::new(),
            };
            NormalizedAnswer::Text(text)
        }
    }
}

/// Canonicalize a question's answer key.
///
/// The key goes through the same letter/text resolution as learner answers,
/// so a key stored as literal option text grades identically to one stored
/// as a letter code. Encoding mismatches (a bare string where a set is
/// expected, or a set where one value is expected) normalize to the empty
/// key, which no answer can match. Unknown question kinds get an empty
/// acceptable-answer list for the same reason.
pub fn normalize_key(question: &Question) -> NormalizedKey {
    match question.kind {
        QuestionKind::Single => NormalizedKey::Choice(
            question
                .key
                .as_one()
                .and_then(|value| resolve_choice(&question.options, value)),
        ),
        QuestionKind::Multiple => NormalizedKey::Choices(match &question.key {
            KeyValue::Many(values) => resolve_choice_set(&question.options, values),
            KeyValue::One(_) => BTreeSet::new(),
        }),
        QuestionKind::Fill => NormalizedKey::Texts(
            question
                .key
                .as_slice()
                .iter()
                .map(|value| normalize_fill(value))
                .collect(),
        ),
        QuestionKind::Unknown => NormalizedKey::Texts(Vec::new()),
    }
}
