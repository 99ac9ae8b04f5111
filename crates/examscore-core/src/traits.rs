//! Record-store read interface consumed by the report aggregator.
//!
//! Implemented by the `examscore-store` crate.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Candidate, ExamResult, ExamSession, JobDescription, Response};

// ---------------------------------------------------------------------------
// Exam data store trait
// ---------------------------------------------------------------------------

/// Read access to the records an exam report is built from, all keyed by
/// exam session id.
///
/// A missing session, result, candidate, or job description is reported as
/// [`StoreError::NotFound`]. A session with no responses is not an error.
#[async_trait]
pub trait ExamDataStore: Send + Sync {
    /// Human-readable store name (e.g. "json").
    fn name(&self) -> &str;

    async fn fetch_session(&self, session_id: &str) -> Result<ExamSession, StoreError>;

    /// Responses for the session, in submission order, joined with their
    /// question definitions.
    async fn fetch_responses(&self, session_id: &str) -> Result<Vec<Response>, StoreError>;

    async fn fetch_result(&self, session_id: &str) -> Result<ExamResult, StoreError>;

    /// The candidate who took the session.
    async fn fetch_candidate(&self, session_id: &str) -> Result<Candidate, StoreError>;

    /// The job the session was taken for.
    async fn fetch_job_description(&self, session_id: &str)
        -> Result<JobDescription, StoreError>;
}
