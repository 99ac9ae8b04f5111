//! Store backed by a JSON export on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use examscore_core::error::StoreError;
use examscore_core::model::{Candidate, ExamResult, ExamSession, JobDescription, Response};
use examscore_core::traits::ExamDataStore;

use crate::dataset::Dataset;
use crate::memory::InMemoryStore;

/// On-disk layout of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// One document holding every table.
    File,
    /// One `<table>.json` file per table.
    Directory,
}

/// Reads a JSON export on first use and serves it from memory afterwards.
pub struct JsonStore {
    path: PathBuf,
    layout: JsonLayout,
    loaded: OnceCell<InMemoryStore>,
}

impl JsonStore {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), JsonLayout::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), JsonLayout::Directory)
    }

    fn new(path: PathBuf, layout: JsonLayout) -> Self {
        Self {
            path,
            layout,
            loaded: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> JsonLayout {
        self.layout
    }

    async fn store(&self) -> Result<&InMemoryStore, StoreError> {
        self.loaded
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let layout = self.layout;
                let dataset = tokio::task::spawn_blocking(move || match layout {
                    JsonLayout::File => Dataset::load_file(&path),
                    JsonLayout::Directory => Dataset::load_dir(&path),
                })
                .await
                .map_err(|e| StoreError::Unavailable(format!("loader task failed: {e}")))?
                .map_err(|e| StoreError::Unavailable(format!("{e:#}")))?;

                tracing::debug!(
                    path = %self.path.display(),
                    sessions = dataset.sessions.len(),
                    responses = dataset.responses.len(),
                    "loaded exam dataset"
                );
                Ok::<_, StoreError>(InMemoryStore::new(dataset))
            })
            .await
    }

    /// Ids of every session in the export.
    pub async fn session_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.store().await?.session_ids())
    }
}

#[async_trait]
impl ExamDataStore for JsonStore {
    fn name(&self) -> &str {
        match self.layout {
            JsonLayout::File => "json",
            JsonLayout::Directory => "json_dir",
        }
    }

    async fn fetch_session(&self, session_id: &str) -> Result<ExamSession, StoreError> {
        self.store().await?.fetch_session(session_id).await
    }

    async fn fetch_responses(&self, session_id: &str) -> Result<Vec<Response>, StoreError> {
        self.store().await?.fetch_responses(session_id).await
    }

    async fn fetch_result(&self, session_id: &str) -> Result<ExamResult, StoreError> {
        self.store().await?.fetch_result(session_id).await
    }

    async fn fetch_candidate(&self, session_id: &str) -> Result<Candidate, StoreError> {
        self.store().await?.fetch_candidate(session_id).await
    }

    async fn fetch_job_description(&self, session_id: &str) -> Result<JobDescription, StoreError> {
        self.store().await?.fetch_job_description(session_id).await
    }
}
