//! JSON export of the exam tables.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use examscore_core::model::{
    Candidate, ExamResult, ExamSession, JobDescription, Question, Response,
};

/// All exam records, one vector per table.
///
/// As a single file this is one JSON object with a key per table. As a
/// directory it is one `<table>.json` array per table; missing files are
/// empty tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub sessions: Vec<ExamSession>,
    pub questions: Vec<Question>,
    pub responses: Vec<Response>,
    pub results: Vec<ExamResult>,
    pub candidates: Vec<Candidate>,
    pub job_descriptions: Vec<JobDescription>,
}

impl Dataset {
    /// Parse a single-document dataset.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut dataset: Dataset =
            serde_json::from_str(content).context("failed to parse dataset JSON")?;
        dataset.join_questions();
        Ok(dataset)
    }

    /// Load a single-document dataset file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset: {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load a dataset split into one file per table.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("not a directory: {}", dir.display());
        }

        let mut dataset = Dataset {
            sessions: read_table(dir, "sessions")?,
            questions: read_table(dir, "questions")?,
            responses: read_table(dir, "responses")?,
            results: read_table(dir, "results")?,
            candidates: read_table(dir, "candidates")?,
            job_descriptions: read_table(dir, "job_descriptions")?,
        };
        dataset.join_questions();
        Ok(dataset)
    }

    /// Attach question definitions to responses that do not carry one.
    pub fn join_questions(&mut self) {
        let by_id: HashMap<&str, &Question> =
            self.questions.iter().map(|q| (q.id.as_str(), q)).collect();

        let mut orphans = 0usize;
        for response in self.responses.iter_mut().filter(|r| r.question.is_none()) {
            match by_id.get(response.question_id.as_str()) {
                Some(q) => response.question = Some((*q).clone()),
                None => orphans += 1,
            }
        }
        if orphans > 0 {
            tracing::warn!("{orphans} response(s) reference unknown questions");
        }
    }

    /// Save the dataset as a single pretty-printed JSON document.
    pub fn save_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize dataset")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write dataset to {}", path.display()))
    }
}

fn read_table<T: DeserializeOwned>(dir: &Path, table: &str) -> Result<Vec<T>> {
    let path = dir.join(format!("{table}.json"));
    if !path.exists() {
        tracing::debug!("no {} table in {}", table, dir.display());
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
pub(crate) const SAMPLE_DATASET: &str = r#"{
    "sessions": [
        { "id": "s1", "candidate_id": "c1", "job_description_id": "j1", "status": "completed" }
    ],
    "questions": [
        { "id": "q1", "question_text": "Binary search?", "question_type": "mcq",
          "question_category": "technical", "points": 2, "correct_answer": "B" },
        { "id": "t1", "question_text": "Explain REST", "question_type": "text", "points": 5 }
    ],
    "responses": [
        { "question_id": "q1", "exam_session_id": "s1", "answer_text": "B",
          "is_correct": true, "points_earned": 2 },
        { "question_id": "t1", "exam_session_id": "s1", "answer_text": "...",
          "points_earned": 2,
          "evaluation_details": { "ai_evaluation": { "ai_confidence": 0.8 } } },
        { "question_id": "ghost", "exam_session_id": "s1" }
    ],
    "results": [
        { "exam_session_id": "s1", "total_score": 4, "max_score": 7, "percentage": 57.14 }
    ],
    "candidates": [ { "id": "c1", "name": "Ada", "email": "ada@example.com" } ],
    "job_descriptions": [ { "id": "j1", "title": "Engineer", "required_skills": ["SQL"] } ]
}"#;
