//! Error types for evaluation, data access, and report generation.

use thiserror::Error;

use crate::model::QuestionType;

/// Errors raised by the answer evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The evaluator only scores multiple-choice questions.
    #[error("invalid question type for MCQ evaluation: question {question_id} is {found}")]
    InvalidQuestionType {
        question_id: String,
        found: QuestionType,
    },
}

/// Kind of record fetched from the exam data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Session,
    Responses,
    Result,
    Candidate,
    JobDescription,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Session => write!(f, "exam session"),
            RecordKind::Responses => write!(f, "exam responses"),
            RecordKind::Result => write!(f, "exam result"),
            RecordKind::Candidate => write!(f, "candidate"),
            RecordKind::JobDescription => write!(f, "job description"),
        }
    }
}

/// Errors that can occur when reading from an exam data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{record} not found: {id}")]
    NotFound { record: RecordKind, id: String },

    /// The store could not be read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(record: RecordKind, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            record,
            id: id.into(),
        }
    }

    /// Returns `true` if the record is absent rather than unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors surfaced by report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A record required for the report could not be fetched.
    #[error("missing required data for report of session {session_id}: {source}")]
    Fetch {
        session_id: String,
        #[source]
        source: StoreError,
    },
}

impl ReportError {
    /// The session the failed report was generated for.
    pub fn session_id(&self) -> &str {
        match self {
            ReportError::Fetch { session_id, .. } => session_id,
        }
    }
}
