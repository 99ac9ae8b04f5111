//! In-memory exam data store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use examscore_core::error::{RecordKind, StoreError};
use examscore_core::model::{Candidate, ExamResult, ExamSession, JobDescription, Response};
use examscore_core::traits::ExamDataStore;

use crate::dataset::Dataset;

/// A store that serves records from an indexed [`Dataset`].
///
/// Used by the JSON stores once loaded, and directly in tests.
pub struct InMemoryStore {
    sessions: HashMap<String, ExamSession>,
    responses: HashMap<String, Vec<Response>>,
    results: HashMap<String, ExamResult>,
    candidates: HashMap<String, Candidate>,
    job_descriptions: HashMap<String, JobDescription>,
    /// Number of fetch calls made.
    call_count: AtomicU32,
}

impl InMemoryStore {
    /// Index a dataset by session. Responses keep their dataset order.
    pub fn new(dataset: Dataset) -> Self {
        let mut responses: HashMap<String, Vec<Response>> = HashMap::new();
        for response in dataset.responses {
            responses
                .entry(response.exam_session_id.clone())
                .or_default()
                .push(response);
        }

        Self {
            sessions: dataset
                .sessions
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            responses,
            results: dataset
                .results
                .into_iter()
                .map(|r| (r.exam_session_id.clone(), r))
                .collect(),
            candidates: dataset
                .candidates
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            job_descriptions: dataset
                .job_descriptions
                .into_iter()
                .map(|j| (j.id.clone(), j))
                .collect(),
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of fetch calls made to this store.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Ids of every known session, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn session(&self, session_id: &str) -> Result<&ExamSession, StoreError> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Session, session_id))
    }

    fn record(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl ExamDataStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_session(&self, session_id: &str) -> Result<ExamSession, StoreError> {
        self.record();
        self.session(session_id).cloned()
    }

    async fn fetch_responses(&self, session_id: &str) -> Result<Vec<Response>, StoreError> {
        self.record();
        self.session(session_id)?;
        Ok(self.responses.get(session_id).cloned().unwrap_or_default())
    }

    async fn fetch_result(&self, session_id: &str) -> Result<ExamResult, StoreError> {
        self.record();
        self.results
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::Result, session_id))
    }

    async fn fetch_candidate(&self, session_id: &str) -> Result<Candidate, StoreError> {
        self.record();
        let candidate_id = &self.session(session_id)?.candidate_id;
        self.candidates
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::Candidate, candidate_id.as_str()))
    }

    async fn fetch_job_description(&self, session_id: &str) -> Result<JobDescription, StoreError> {
        self.record();
        let job_id = &self.session(session_id)?.job_description_id;
        self.job_descriptions.get(job_id).cloned().ok_or_else(|| {
            StoreError::not_found(RecordKind::JobDescription, job_id.as_str())
        })
    }
}
