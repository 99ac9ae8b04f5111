//! Core data model types for examscore.
//!
//! These mirror the records owned by the exam database: questions, candidate
//! responses, sessions, results, candidates, and job descriptions. Field
//! names follow the database column names so fetched rows deserialize
//! directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::evaluator::{EvaluationResult, MatchDetails, MatchMethod};

/// Kind of exam question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Text,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "mcq"),
            QuestionType::Text => write!(f, "text"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mcq" | "multiple_choice" => Ok(QuestionType::Mcq),
            "text" | "essay" => Ok(QuestionType::Text),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Question category used for score bucketing and skill mapping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Technical,
    Aptitude,
    #[default]
    General,
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionCategory::Technical => write!(f, "technical"),
            QuestionCategory::Aptitude => write!(f, "aptitude"),
            QuestionCategory::General => write!(f, "general"),
        }
    }
}

impl FromStr for QuestionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technical" => Ok(QuestionCategory::Technical),
            "aptitude" => Ok(QuestionCategory::Aptitude),
            "general" => Ok(QuestionCategory::General),
            other => Err(format!("unknown question category: {other}")),
        }
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single multiple-choice option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqOption {
    /// Option identifier (e.g. "A").
    pub option: String,
    /// Display text of the option.
    pub text: String,
}

/// An exam question definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub question_category: QuestionCategory,
    #[serde(default)]
    pub difficulty_level: Difficulty,
    #[serde(default = "default_points")]
    pub points: u32,
    /// Option identifier, option text, or free text for text questions.
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub mcq_options: Vec<McqOption>,
    #[serde(default)]
    pub answer_explanation: Option<String>,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// The correct answer with surrounding whitespace removed, if any.
    pub fn correct_answer_trimmed(&self) -> Option<&str> {
        self.correct_answer
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Resolve the correct answer to one of the declared options, matching
    /// either the option identifier or its text case-insensitively.
    pub fn correct_option(&self) -> Option<&McqOption> {
        let correct = self.correct_answer_trimmed()?.to_lowercase();
        self.mcq_options
            .iter()
            .find(|opt| opt.option.to_lowercase() == correct || opt.text.to_lowercase() == correct)
    }
}

/// A named collection of questions loaded from a bank file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Multiple-choice questions only.
    pub fn mcq_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(|q| q.question_type == QuestionType::Mcq)
    }

    /// Sum of all question points.
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

/// Feedback produced by the external text-evaluation workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub overall: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// AI evaluation attached to a text response. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiEvaluation {
    #[serde(default)]
    pub ai_confidence: Option<f64>,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

/// The `evaluation_details` column of a response.
///
/// Text responses carry an `ai_evaluation` written by the external workflow;
/// MCQ responses carry the evaluator's confidence and match details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_evaluation: Option<AiEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<MatchMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching: Option<MatchDetails>,
}

impl EvaluationDetails {
    /// AI confidence for a text response, if the workflow provided one.
    pub fn ai_confidence(&self) -> Option<f64> {
        self.ai_evaluation.as_ref().and_then(|e| e.ai_confidence)
    }

    /// AI feedback for a text response, if the workflow provided one.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.ai_evaluation.as_ref().and_then(|e| e.feedback.as_ref())
    }
}

/// A candidate's response to one question, joined with its question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: String,
    pub question_id: String,
    pub exam_session_id: String,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub time_taken_seconds: Option<u32>,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub evaluation_details: Option<EvaluationDetails>,
    /// Joined question definition.
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Response {
    /// Build the evaluated response row for an MCQ answer.
    pub fn evaluated(
        id: impl Into<String>,
        exam_session_id: impl Into<String>,
        question: &Question,
        time_taken_seconds: Option<u32>,
        result: &EvaluationResult,
    ) -> Self {
        Self {
            id: id.into(),
            question_id: question.id.clone(),
            exam_session_id: exam_session_id.into(),
            answer_text: Some(result.selected_option.clone()),
            time_taken_seconds,
            is_correct: result.is_correct,
            points_earned: result.points_earned,
            evaluation_details: Some(EvaluationDetails {
                ai_evaluation: None,
                confidence: Some(result.confidence),
                method: result.method,
                matching: Some(result.evaluation_details.clone()),
            }),
            question: Some(question.clone()),
            submitted_at: Some(Utc::now()),
        }
    }

    /// Type of the joined question, if present.
    pub fn question_type(&self) -> Option<QuestionType> {
        self.question.as_ref().map(|q| q.question_type)
    }

    /// Maximum points for this response; 1 when the question is missing.
    pub fn max_points(&self) -> u32 {
        self.question.as_ref().map(|q| q.points).unwrap_or(1)
    }
}

/// Lifecycle status of an exam session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Expired,
    Terminated,
}

/// An exam session taken by a candidate for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: String,
    pub candidate_id: String,
    pub job_description_id: String,
    #[serde(default)]
    pub exam_token: String,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub adaptive_questions_added: u32,
    #[serde(default)]
    pub max_adaptive_questions: u32,
}

fn default_duration() -> u32 {
    30
}

/// Outcome of an exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Passed,
    Failed,
    #[default]
    Pending,
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationStatus::Passed => write!(f, "passed"),
            EvaluationStatus::Failed => write!(f, "failed"),
            EvaluationStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Structured hiring decision produced by the external AI evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringDecision {
    pub recommendation: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// The `hiring_recommendations` blob of an exam result.
///
/// Only `hiring_decision` is read; everything else is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiringRecommendations {
    #[serde(default)]
    pub hiring_decision: Option<HiringDecision>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Persisted exam result for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(default)]
    pub id: String,
    pub exam_session_id: String,
    #[serde(default)]
    pub candidate_id: String,
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: f64,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub wrong_answers: u32,
    #[serde(default)]
    pub skipped_questions: u32,
    #[serde(default)]
    pub technical_score: u32,
    #[serde(default)]
    pub aptitude_score: u32,
    #[serde(default)]
    pub time_taken_minutes: Option<u32>,
    #[serde(default)]
    pub evaluation_status: EvaluationStatus,
    /// Opaque AI evaluation blob.
    #[serde(default)]
    pub ai_evaluation: Option<serde_json::Value>,
    /// Opaque text-evaluation summary blob.
    #[serde(default)]
    pub text_evaluation_summary: Option<serde_json::Value>,
    #[serde(default)]
    pub hiring_recommendations: Option<HiringRecommendations>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A candidate record (subset used by reports).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub candidate_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A job description record (subset used by reports).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: String,
    #[serde(default)]
    pub job_description_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}
