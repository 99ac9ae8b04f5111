//! Candidate report types, the pure report builder, and the aggregator that
//! fetches a session's records and builds its report.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::analysis::{
    analyze_mcq_performance, analyze_questions, analyze_text_performance, category_performance,
    McqRollup, QuestionAnalysis, TextRollup,
};
use crate::error::ReportError;
use crate::insights::{extract_hiring_recommendation, generate_insights, HiringRecommendation};
use crate::model::{
    Candidate, EvaluationStatus, ExamResult, ExamSession, JobDescription, QuestionCategory,
    Response,
};
use crate::skills::{identify_skill_gaps, SkillCategoryTable, SkillGap, DEFAULT_REQUIRED_LEVEL};
use crate::statistics::DEFAULT_PASS_THRESHOLD;
use crate::traits::ExamDataStore;

/// Version tag written into every report.
pub const EVALUATION_VERSION: &str = "1.0";

/// Thresholds used while building a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Proficiency required for each job skill, in percent.
    pub required_level: u32,
    /// Category percentage at or above which a strength is reported.
    pub strength_threshold: u32,
    /// Category percentage below which a weakness is reported.
    pub weakness_threshold: u32,
    /// Fallback "hire" cut-off on the overall percentage.
    pub hire_threshold: f64,
    /// Fallback "interview" cut-off on the overall percentage.
    pub interview_threshold: f64,
    /// Pass mark used when summarizing sessions.
    pub pass_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            required_level: DEFAULT_REQUIRED_LEVEL,
            strength_threshold: 80,
            weakness_threshold: 50,
            hire_threshold: 70.0,
            interview_threshold: 50.0,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

/// A complete candidate report for one exam session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique report identifier.
    pub id: Uuid,
    pub session_id: String,
    pub candidate: Candidate,
    pub job_description: JobDescription,
    pub exam_session: ExamSession,
    /// Score as recorded on the exam result.
    pub overall_score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub evaluation_status: EvaluationStatus,
    pub mcq_results: McqRollup,
    pub text_results: TextRollup,
    pub question_analysis: Vec<QuestionAnalysis>,
    pub category_performance: BTreeMap<QuestionCategory, u32>,
    pub skill_gaps: Vec<SkillGap>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub hiring_recommendation: HiringRecommendation,
    pub generated_at: DateTime<Utc>,
    /// Wall-clock time spent fetching and building, in milliseconds.
    pub processing_time_ms: u64,
    pub evaluation_version: String,
}

impl Report {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: Report =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

/// Everything fetched for one session.
#[derive(Debug, Clone)]
pub struct SessionRecords {
    pub session: ExamSession,
    pub responses: Vec<Response>,
    pub result: ExamResult,
    pub candidate: Candidate,
    pub job_description: JobDescription,
}

/// Build a report from already-fetched records. No I/O.
///
/// Scores come from the result record; a disagreement with the summed
/// response points is logged, not corrected.
pub fn build_report(
    records: SessionRecords,
    config: &ReportConfig,
    skills: &SkillCategoryTable,
) -> Report {
    let SessionRecords {
        session,
        responses,
        result,
        candidate,
        job_description,
    } = records;

    let earned: u32 = responses.iter().map(|r| r.points_earned).sum();
    if earned != result.total_score {
        tracing::warn!(
            session_id = %session.id,
            recorded = result.total_score,
            summed = earned,
            "result total score disagrees with response points"
        );
    }

    let mcq_results = analyze_mcq_performance(&responses);
    let text_results = analyze_text_performance(&responses);
    let question_analysis = analyze_questions(&responses);
    let categories = category_performance(&question_analysis);
    let skill_gaps =
        identify_skill_gaps(&categories, &job_description, skills, config.required_level);
    let insights = generate_insights(&question_analysis, &skill_gaps, config);
    let hiring_recommendation = extract_hiring_recommendation(&result, config);

    Report {
        id: Uuid::new_v4(),
        session_id: session.id.clone(),
        candidate,
        job_description,
        exam_session: session,
        overall_score: result.total_score,
        max_score: result.max_score,
        percentage: result.percentage,
        evaluation_status: result.evaluation_status,
        mcq_results,
        text_results,
        question_analysis,
        category_performance: categories,
        skill_gaps,
        strengths: insights.strengths,
        weaknesses: insights.weaknesses,
        recommendations: insights.recommendations,
        hiring_recommendation,
        generated_at: Utc::now(),
        processing_time_ms: 0,
        evaluation_version: EVALUATION_VERSION.to_string(),
    }
}

/// Generates candidate reports from an injected data store.
pub struct ReportAggregator {
    store: Arc<dyn ExamDataStore>,
    config: ReportConfig,
    skills: SkillCategoryTable,
}

impl ReportAggregator {
    pub fn new(store: Arc<dyn ExamDataStore>) -> Self {
        Self {
            store,
            config: ReportConfig::default(),
            skills: SkillCategoryTable::default(),
        }
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_skills(mut self, skills: SkillCategoryTable) -> Self {
        self.skills = skills;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Fetch every record for the session concurrently, then build the
    /// report. Any failed fetch aborts the report.
    pub async fn generate_report(&self, session_id: &str) -> Result<Report, ReportError> {
        let start = Instant::now();
        tracing::debug!(session_id, store = self.store.name(), "generating report");

        let store = &self.store;
        let (session, responses, result, candidate, job_description) = tokio::try_join!(
            store.fetch_session(session_id),
            store.fetch_responses(session_id),
            store.fetch_result(session_id),
            store.fetch_candidate(session_id),
            store.fetch_job_description(session_id),
        )
        .map_err(|source| ReportError::Fetch {
            session_id: session_id.to_string(),
            source,
        })?;

        let records = SessionRecords {
            session,
            responses,
            result,
            candidate,
            job_description,
        };
        let mut report = build_report(records, &self.config, &self.skills);
        report.processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            session_id,
            overall_score = report.overall_score,
            percentage = report.percentage,
            mcq_questions = report.mcq_results.total_questions,
            text_questions = report.text_results.total_questions,
            skill_gaps = report.skill_gaps.len(),
            "report generated"
        );
        Ok(report)
    }

    /// Generate reports for several sessions, at most `parallelism` at a
    /// time. Results are returned in input order; one failure does not
    /// affect the others.
    pub async fn generate_reports(
        &self,
        session_ids: &[String],
        parallelism: usize,
    ) -> Vec<(String, Result<Report, ReportError>)> {
        let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
        let mut futures = FuturesUnordered::new();

        for (index, session_id) in session_ids.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire().await.ok();
                let outcome = self.generate_report(session_id).await;
                if let Err(e) = &outcome {
                    tracing::error!("report for session {session_id} failed: {e:#}");
                }
                (index, session_id.clone(), outcome)
            });
        }

        let mut results = Vec::with_capacity(session_ids.len());
        while let Some(item) = futures.next().await {
            results.push(item);
        }
        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, id, outcome)| (id, outcome))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RecordKind, StoreError};
    use crate::model::{
        AiEvaluation, Difficulty, EvaluationDetails, McqOption, Question, QuestionType,
        SessionStatus,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct FixtureStore {
        records: HashMap<String, SessionRecords>,
        fetches: AtomicU32,
    }

    impl FixtureStore {
        fn get(&self, id: &str, kind: RecordKind) -> Result<&SessionRecords, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.records
                .get(id)
                .ok_or_else(|| StoreError::not_found(kind, id))
        }
    }

    #[async_trait]
    impl ExamDataStore for FixtureStore {
        fn name(&self) -> &str {
            "fixture"
        }

        async fn fetch_session(&self, id: &str) -> Result<ExamSession, StoreError> {
            Ok(self.get(id, RecordKind::Session)?.session.clone())
        }

        async fn fetch_responses(&self, id: &str) -> Result<Vec<Response>, StoreError> {
            Ok(self.get(id, RecordKind::Responses)?.responses.clone())
        }

        async fn fetch_result(&self, id: &str) -> Result<ExamResult, StoreError> {
            Ok(self.get(id, RecordKind::Result)?.result.clone())
        }

        async fn fetch_candidate(&self, id: &str) -> Result<Candidate, StoreError> {
            Ok(self.get(id, RecordKind::Candidate)?.candidate.clone())
        }

        async fn fetch_job_description(&self, id: &str) -> Result<JobDescription, StoreError> {
            Ok(self.get(id, RecordKind::JobDescription)?.job_description.clone())
        }
    }

    fn question(id: &str, kind: QuestionType, category: QuestionCategory, points: u32) -> Question {
        Question {
            id: id.into(),
            question_text: format!("Question {id}"),
            question_type: kind,
            question_category: category,
            difficulty_level: Difficulty::Medium,
            points,
            correct_answer: Some("B".into()),
            mcq_options: vec![
                McqOption {
                    option: "A".into(),
                    text: "O(n)".into(),
                },
                McqOption {
                    option: "B".into(),
                    text: "O(log n)".into(),
                },
            ],
            answer_explanation: None,
        }
    }

    fn response(q: Question, earned: u32, correct: bool) -> Response {
        Response {
            id: format!("r-{}", q.id),
            question_id: q.id.clone(),
            exam_session_id: "s1".into(),
            answer_text: Some("B".into()),
            time_taken_seconds: Some(40),
            is_correct: correct,
            points_earned: earned,
            evaluation_details: None,
            question: Some(q),
            submitted_at: None,
        }
    }

    fn records(session_id: &str, total_score: u32) -> SessionRecords {
        let mut text = response(
            question("t1", QuestionType::Text, QuestionCategory::Technical, 5),
            2,
            false,
        );
        text.evaluation_details = Some(EvaluationDetails {
            ai_evaluation: Some(AiEvaluation {
                ai_confidence: Some(0.8),
                feedback: None,
            }),
            ..Default::default()
        });

        SessionRecords {
            session: ExamSession {
                id: session_id.into(),
                candidate_id: "c1".into(),
                job_description_id: "j1".into(),
                exam_token: "tok".into(),
                status: SessionStatus::Completed,
                duration_minutes: 30,
                total_questions: 3,
                started_at: None,
                completed_at: None,
                adaptive_questions_added: 0,
                max_adaptive_questions: 0,
            },
            responses: vec![
                response(
                    question("q1", QuestionType::Mcq, QuestionCategory::Technical, 2),
                    2,
                    true,
                ),
                response(
                    question("q2", QuestionType::Mcq, QuestionCategory::Aptitude, 3),
                    0,
                    false,
                ),
                text,
            ],
            result: ExamResult {
                id: "res1".into(),
                exam_session_id: session_id.into(),
                candidate_id: "c1".into(),
                total_score,
                max_score: 10,
                percentage: 40.0,
                correct_answers: 1,
                wrong_answers: 2,
                skipped_questions: 0,
                technical_score: 4,
                aptitude_score: 0,
                time_taken_minutes: Some(12),
                evaluation_status: EvaluationStatus::Failed,
                ai_evaluation: None,
                text_evaluation_summary: None,
                hiring_recommendations: None,
                created_at: None,
            },
            candidate: Candidate {
                id: "c1".into(),
                candidate_id: None,
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                phone: None,
            },
            job_description: JobDescription {
                id: "j1".into(),
                job_description_id: None,
                title: "Backend Engineer".into(),
                department: "Engineering".into(),
                required_skills: vec!["SQL".into(), "Problem solving".into()],
            },
        }
    }

    fn store(ids: &[&str]) -> Arc<FixtureStore> {
        let mut fixture = FixtureStore::default();
        for id in ids {
            fixture.records.insert(id.to_string(), records(id, 4));
        }
        Arc::new(fixture)
    }

    #[test]
    fn build_report_end_to_end_numbers() {
        let report = build_report(
            records("s1", 4),
            &ReportConfig::default(),
            &SkillCategoryTable::default(),
        );

        assert_eq!(report.mcq_results.total_questions, 2);
        assert_eq!(report.mcq_results.correct_answers, 1);
        assert_eq!(report.mcq_results.score, 2);
        assert_eq!(report.mcq_results.percentage, 40);

        assert_eq!(report.text_results.total_questions, 1);
        assert_eq!(report.text_results.total_score, 2);
        assert_eq!(report.text_results.max_score, 5);
        assert_eq!(report.text_results.percentage, 40);
        assert!((report.text_results.average_confidence - 0.8).abs() < f64::EPSILON);

        // technical: 4 of 7 -> 57%, aptitude: 0 of 3 -> 0%
        assert_eq!(report.category_performance[&QuestionCategory::Technical], 57);
        assert_eq!(report.category_performance[&QuestionCategory::Aptitude], 0);

        let gap_skills: Vec<_> = report.skill_gaps.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(gap_skills, ["SQL", "Problem solving"]);

        assert_eq!(report.overall_score, 4);
        assert_eq!(report.hiring_recommendation.recommendation, "reject");
        assert_eq!(report.evaluation_version, EVALUATION_VERSION);
        assert_eq!(report.question_analysis.len(), 3);
    }

    #[test]
    fn build_report_keeps_recorded_score_on_mismatch() {
        let report = build_report(
            records("s1", 9),
            &ReportConfig::default(),
            &SkillCategoryTable::default(),
        );
        assert_eq!(report.overall_score, 9);
    }

    #[tokio::test]
    async fn generate_report_fetches_all_records() {
        let fixture = store(&["s1"]);
        let aggregator = ReportAggregator::new(fixture.clone());
        let report = aggregator.generate_report("s1").await.unwrap();
        assert_eq!(report.session_id, "s1");
        assert_eq!(report.candidate.name, "Ada Lovelace");
        assert_eq!(fixture.fetches.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn generate_report_missing_session_is_fetch_error() {
        let aggregator = ReportAggregator::new(store(&[]));
        let err = aggregator.generate_report("nope").await.unwrap_err();
        assert_eq!(err.session_id(), "nope");
        let ReportError::Fetch { source, .. } = err;
        assert!(source.is_not_found());
    }

    #[tokio::test]
    async fn config_thresholds_apply() {
        let config = ReportConfig {
            hire_threshold: 30.0,
            ..Default::default()
        };
        let aggregator = ReportAggregator::new(store(&["s1"])).with_config(config);
        let report = aggregator.generate_report("s1").await.unwrap();
        assert_eq!(report.hiring_recommendation.recommendation, "hire");
    }

    #[tokio::test]
    async fn generate_reports_isolates_failures_and_keeps_order() {
        let aggregator = ReportAggregator::new(store(&["s1", "s3"]));
        let ids = vec!["s3".to_string(), "missing".to_string(), "s1".to_string()];
        let results = aggregator.generate_reports(&ids, 2).await;

        let order: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, ["s3", "missing", "s1"]);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_ok());
    }

    #[test]
    fn report_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("s1.json");
        let report = build_report(
            records("s1", 4),
            &ReportConfig::default(),
            &SkillCategoryTable::default(),
        );
        report.save_json(&path).unwrap();
        let loaded = Report::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.category_performance, report.category_performance);
        assert_eq!(loaded.skill_gaps, report.skill_gaps);
    }

    #[test]
    fn report_config_partial_toml() {
        let config: ReportConfig = toml::from_str("required_level = 60").unwrap();
        assert_eq!(config.required_level, 60);
        assert_eq!(config.strength_threshold, 80);
        assert_eq!(config.pass_threshold, 60.0);
    }
}
