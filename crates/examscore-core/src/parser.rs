//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{McqOption, Question, QuestionBank, QuestionType};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default = "default_type_str", rename = "type")]
    question_type: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    options: Vec<TomlOption>,
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    option: String,
    text: String,
}

fn default_type_str() -> String {
    "mcq".to_string()
}

fn default_points() -> u32 {
    1
}

fn parse_field<T>(value: Option<String>) -> Result<T>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value {
        Some(v) => v.parse().map_err(|e: String| anyhow::anyhow!("{}", e)),
        None => Ok(T::default()),
    }
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let question_type: QuestionType = q
                .question_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;
            let question_category = parse_field(q.category)
                .with_context(|| format!("question {}", q.id))?;
            let difficulty_level = parse_field(q.difficulty)
                .with_context(|| format!("question {}", q.id))?;

            Ok(Question {
                id: q.id,
                question_text: q.text,
                question_type,
                question_category,
                difficulty_level,
                points: q.points,
                correct_answer: q.correct_answer,
                mcq_options: q
                    .options
                    .into_iter()
                    .map(|o| McqOption {
                        option: o.option,
                        text: o.text,
                    })
                    .collect(),
                answer_explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question bank files from a directory.
///
/// Files that fail to parse are logged and skipped.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a question bank for common authoring mistakes.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question bank has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &bank.questions {
        if q.points == 0 {
            warnings.push(ValidationWarning::question(&q.id, "question is worth 0 points"));
        }

        match q.question_type {
            QuestionType::Mcq => {
                if q.mcq_options.is_empty() {
                    warnings.push(ValidationWarning::question(&q.id, "MCQ has no options"));
                }
                match q.correct_answer_trimmed() {
                    None => warnings.push(ValidationWarning::question(
                        &q.id,
                        "MCQ has no correct_answer; answers will be ungraded",
                    )),
                    Some(answer) if !q.mcq_options.is_empty() && q.correct_option().is_none() => {
                        warnings.push(ValidationWarning::question(
                            &q.id,
                            format!("correct_answer '{answer}' does not match any option"),
                        ))
                    }
                    Some(_) => {}
                }
            }
            QuestionType::Text => {
                if !q.mcq_options.is_empty() {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        "text question has options; they will be ignored",
                    ));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionCategory};
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "backend-basics"
name = "Backend basics"
description = "Screening questions for backend roles"

[[questions]]
id = "q1"
text = "What is the time complexity of binary search?"
category = "technical"
difficulty = "easy"
points = 2
correct_answer = "B"
explanation = "The search space halves on every step."
options = [
    { option = "A", text = "O(n)" },
    { option = "B", text = "O(log n)" },
]

[[questions]]
id = "t1"
text = "Describe how you would design a rate limiter."
type = "text"
points = 5
"#;

    fn path() -> PathBuf {
        PathBuf::from("bank.toml")
    }

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &path()).unwrap();
        assert_eq!(bank.id, "backend-basics");
        assert_eq!(bank.questions.len(), 2);

        let q1 = &bank.questions[0];
        assert_eq!(q1.question_type, QuestionType::Mcq);
        assert_eq!(q1.question_category, QuestionCategory::Technical);
        assert_eq!(q1.difficulty_level, Difficulty::Easy);
        assert_eq!(q1.points, 2);
        assert_eq!(q1.mcq_options.len(), 2);
        assert_eq!(q1.correct_option().unwrap().text, "O(log n)");

        let t1 = &bank.questions[1];
        assert_eq!(t1.question_type, QuestionType::Text);
        assert_eq!(t1.question_category, QuestionCategory::General);
        assert_eq!(t1.difficulty_level, Difficulty::Medium);

        assert_eq!(bank.total_points(), 7);
        assert_eq!(bank.mcq_questions().count(), 1);
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_defaults() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
text = "Pick one"
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        let q = &bank.questions[0];
        assert_eq!(q.question_type, QuestionType::Mcq);
        assert_eq!(q.points, 1);
        assert!(q.correct_answer.is_none());
        assert!(bank.description.is_empty());
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = "q1"
text = "Pick one"
category = "astrology"
"#;
        let err = parse_question_bank_str(toml, &path()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question category"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_reports_authoring_mistakes() {
        let toml = r#"
[bank]
id = "mistakes"
name = "Mistakes"

[[questions]]
id = "dup"
text = "First"
correct_answer = "A"
options = [{ option = "A", text = "yes" }]

[[questions]]
id = "dup"
text = "No options"
correct_answer = "A"

[[questions]]
id = "q3"
text = "Unresolvable answer"
correct_answer = "Z"
points = 0
options = [{ option = "A", text = "yes" }]

[[questions]]
id = "q4"
text = "No answer"
options = [{ option = "A", text = "yes" }]

[[questions]]
id = "t1"
text = "Essay"
type = "text"
options = [{ option = "A", text = "yes" }]
"#;
        let bank = parse_question_bank_str(toml, &path()).unwrap();
        let warnings = validate_question_bank(&bank);
        let has = |id: &str, needle: &str| {
            warnings
                .iter()
                .any(|w| w.question_id.as_deref() == Some(id) && w.message.contains(needle))
        };
        assert!(has("dup", "duplicate"));
        assert!(has("dup", "no options"));
        assert!(has("q3", "does not match any option"));
        assert!(has("q3", "0 points"));
        assert!(has("q4", "no correct_answer"));
        assert!(has("t1", "text question has options"));
        assert!(!has("q1", ""));
    }

    #[test]
    fn validate_empty_bank() {
        let bank = parse_question_bank_str("[bank]\nid = \"e\"\nname = \"Empty\"\n", &path()).unwrap();
        let warnings = validate_question_bank(&bank);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("more.toml"),
            VALID_TOML.replace("backend-basics", "nested-bank"),
        )
        .unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        let ids: Vec<_> = banks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["backend-basics", "nested-bank"]);
    }

    #[test]
    fn load_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bank.toml");
        std::fs::write(&file, VALID_TOML).unwrap();
        assert!(load_bank_directory(&file).is_err());
    }
}
