//! JSON quiz-document parsing and authoring-time validation.
//!
//! Stored quizzes are JSON exports of the platform's document database.
//! Loading is forgiving about shape drift (older records use different
//! field names and answer encodings; the model's serde attributes absorb
//! that), strict about JSON itself, and never lets one bad file poison a
//! directory load.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::QuizError;
use crate::model::{QuestionKind, QuizDefinition};
use crate::normalize::{normalize_key, NormalizedKey};

/// Authoring ceiling on the sum of question weights.
pub const MAX_TOTAL_WEIGHT: f64 = 100.0;
/// Number of addressable options (letters A-Z).
pub const MAX_OPTIONS: usize = 26;

/// Parse one quiz document from a JSON string. `source_name` labels the
/// document in error messages (a file path or a database document id).
pub fn parse_quiz_str(content: &str, source_name: &str) -> Result<QuizDefinition, QuizError> {
    let quiz: QuizDefinition =
        serde_json::from_str(content).map_err(|e| QuizError::Malformed {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    for (index, question) in quiz.questions.iter().enumerate() {
        if question.kind == QuestionKind::Unknown {
            tracing::warn!(
                "{source_name}: question {index} has an unrecognized kind and will grade as incorrect"
            );
        }
    }

    Ok(quiz)
}

/// Parse a quiz document from a JSON file.
pub fn parse_quiz(path: &Path) -> Result<QuizDefinition, QuizError> {
    let content = std::fs::read_to_string(path).map_err(|source| QuizError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_quiz_str(&content, &path.display().to_string())
}

/// Recursively load all `.json` quiz documents from a directory.
///
/// Unparseable files are skipped with a warning so a single corrupt export
/// does not hide the rest of the course material.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<QuizDefinition>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The 0-based question index (if the warning concerns one question).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for common authoring issues.
///
/// These are warnings, not errors: grading stays total regardless, and the
/// weight ceiling in particular is enforced here at authoring time only,
/// never at scoring time.
pub fn validate_quiz(quiz: &QuizDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let total_weight = quiz.possible();
    if total_weight > MAX_TOTAL_WEIGHT {
        warnings.push(ValidationWarning {
            question: None,
            message: format!(
                "total weight {total_weight} exceeds the ceiling of {MAX_TOTAL_WEIGHT}"
            ),
        });
    }

    for (index, question) in quiz.questions.iter().enumerate() {
        if question.kind == QuestionKind::Unknown {
            warnings.push(ValidationWarning {
                question: Some(index),
                message: "unrecognized question kind".into(),
            });
        }

        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(index),
                message: "prompt is empty".into(),
            });
        }

        if question.weight < 0.0 {
            warnings.push(ValidationWarning {
                question: Some(index),
                message: format!("weight {} is negative", question.weight),
            });
        }

        if !(1..=5).contains(&question.difficulty) {
            warnings.push(ValidationWarning {
                question: Some(index),
                message: format!("difficulty {} is outside 1-5", question.difficulty),
            });
        }

        match question.kind {
            QuestionKind::Single | QuestionKind::Multiple => {
                if question.options.is_empty() {
                    warnings.push(ValidationWarning {
                        question: Some(index),
                        message: "choice question has no options".into(),
                    });
                } else if question.options.len() > MAX_OPTIONS {
                    warnings.push(ValidationWarning {
                        question: Some(index),
                        message: format!(
                            "{} options exceed the {MAX_OPTIONS} addressable letters",
                            question.options.len()
                        ),
                    });
                }

                let unresolvable = match normalize_key(question) {
                    NormalizedKey::Choice(letter) => letter.is_none(),
                    NormalizedKey::Choices(letters) => letters.is_empty(),
                    NormalizedKey::Texts(_) => true,
                };
                if unresolvable {
                    warnings.push(ValidationWarning {
                        question: Some(index),
                        message: "answer key does not resolve to any option".into(),
                    });
                }
            }
            QuestionKind::Fill => {
                let acceptable = match normalize_key(question) {
                    NormalizedKey::Texts(texts) => texts,
                    _ => Vec::new(),
                };
                if acceptable.iter().all(String::is_empty) {
                    warnings.push(ValidationWarning {
                        question: Some(index),
                        message: "fill-in question has no acceptable answer".into(),
                    });
                }
            }
            QuestionKind::Unknown => {}
        }
    }

    warnings
}
