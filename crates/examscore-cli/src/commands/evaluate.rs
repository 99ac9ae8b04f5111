//! The `examscore evaluate` command.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use examscore_core::evaluator::{AnswerEvaluator, EvaluationOptions, EvaluationResult};
use examscore_core::model::{ExamSession, Question, QuestionType, Response, SessionStatus};
use examscore_core::statistics::{
    evaluation_stats, performance_metrics, summarize_session, EvaluationStats, PerformanceMetrics,
    SessionSummary,
};
use examscore_store::config::load_config_from;

use super::load_banks;

pub struct EvaluateArgs {
    pub questions: PathBuf,
    pub answers: PathBuf,
    pub case_sensitive: bool,
    pub partial_credit: bool,
    pub fuzzy: bool,
    pub fuzzy_threshold: Option<f64>,
    pub format: String,
    pub config: Option<PathBuf>,
}

/// A candidate's answers, with optional timing for adaptive metrics.
#[derive(Debug, Deserialize)]
struct AnswerSheet {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default = "default_duration")]
    duration_minutes: u32,
    #[serde(default)]
    max_adaptive_questions: u32,
    answers: HashMap<String, String>,
    #[serde(default)]
    time_taken_seconds: HashMap<String, u32>,
}

fn default_duration() -> u32 {
    60
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerFile {
    Sheet(AnswerSheet),
    Plain(HashMap<String, String>),
}

impl AnswerFile {
    fn into_sheet(self) -> AnswerSheet {
        match self {
            AnswerFile::Sheet(sheet) => sheet,
            AnswerFile::Plain(answers) => AnswerSheet {
                session_id: None,
                started_at: None,
                duration_minutes: default_duration(),
                max_adaptive_questions: 0,
                answers,
                time_taken_seconds: HashMap::new(),
            },
        }
    }
}

fn load_answers(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    let file: AnswerFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", path.display()))?;
    Ok(file.into_sheet())
}

#[derive(Debug, Serialize)]
struct EvaluationOutput {
    session_id: String,
    results: BTreeMap<String, EvaluationResult>,
    stats: EvaluationStats,
    summary: SessionSummary,
    metrics: PerformanceMetrics,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    anyhow::ensure!(
        matches!(args.format.as_str(), "text" | "json"),
        "unknown output format: {} (expected text or json)",
        args.format
    );
    if let Some(threshold) = args.fuzzy_threshold {
        anyhow::ensure!(
            (0.0..=1.0).contains(&threshold),
            "fuzzy threshold must be between 0.0 and 1.0"
        );
    }

    let config = load_config_from(args.config.as_deref())?;
    let options = EvaluationOptions {
        case_sensitive: args.case_sensitive || config.evaluation.case_sensitive,
        allow_partial_credit: args.partial_credit || config.evaluation.allow_partial_credit,
        enable_fuzzy_matching: args.fuzzy
            || args.fuzzy_threshold.is_some()
            || config.evaluation.enable_fuzzy_matching,
        fuzzy_threshold: args
            .fuzzy_threshold
            .unwrap_or(config.evaluation.fuzzy_threshold),
        ..config.evaluation.clone()
    };

    let banks = load_banks(&args.questions)?;
    let questions: Vec<Question> = banks.into_iter().flat_map(|b| b.questions).collect();
    anyhow::ensure!(
        !questions.is_empty(),
        "no questions found in {}",
        args.questions.display()
    );

    let sheet = load_answers(&args.answers)?;
    for id in sheet.answers.keys() {
        if !questions.iter().any(|q| &q.id == id) {
            eprintln!("Warning: answer for unknown question '{id}' ignored");
        }
    }

    let evaluator = AnswerEvaluator::new(options);
    let results = evaluator.batch_evaluate(&questions, &sheet.answers);
    let stats = evaluation_stats(&results);

    let session_id = sheet
        .session_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let responses: Vec<Response> = questions
        .iter()
        .filter_map(|q| {
            results.get(&q.id).map(|result| {
                Response::evaluated(
                    uuid::Uuid::new_v4().to_string(),
                    session_id.clone(),
                    q,
                    sheet.time_taken_seconds.get(&q.id).copied(),
                    result,
                )
            })
        })
        .collect();

    let mcq_count = questions
        .iter()
        .filter(|q| q.question_type == QuestionType::Mcq)
        .count() as u32;
    let summary = summarize_session(&responses, mcq_count, config.report.pass_threshold);

    let session = ExamSession {
        id: session_id.clone(),
        candidate_id: String::new(),
        job_description_id: String::new(),
        exam_token: String::new(),
        status: SessionStatus::InProgress,
        duration_minutes: sheet.duration_minutes,
        total_questions: mcq_count,
        started_at: sheet.started_at,
        completed_at: None,
        adaptive_questions_added: 0,
        max_adaptive_questions: sheet.max_adaptive_questions,
    };
    let metrics = performance_metrics(&session, &responses, Utc::now());

    tracing::debug!(
        session_id = %session_id,
        evaluated = results.len(),
        "evaluated answer sheet"
    );

    if args.format == "json" {
        let output = EvaluationOutput {
            session_id,
            results,
            stats,
            summary,
            metrics,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_results(&questions, &results);
    println!(
        "\nEvaluated {} question(s): {} correct, {}/{} points, accuracy {:.1}%, average confidence {:.2}",
        stats.total_questions,
        stats.correct_answers,
        stats.earned_points,
        stats.total_points,
        stats.accuracy_rate * 100.0,
        stats.average_confidence,
    );
    println!(
        "Session: {}/{} points ({}%), {} skipped, {}",
        summary.total_score,
        summary.max_score,
        summary.percentage,
        summary.skipped_questions,
        summary.evaluation_status.to_string().to_uppercase(),
    );
    if metrics.should_add_questions {
        println!(
            "Adaptive: add {} question(s) next",
            metrics.recommended_difficulty
        );
    }

    Ok(())
}

fn print_results(questions: &[Question], results: &BTreeMap<String, EvaluationResult>) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Question", "Answer", "Correct", "Result", "Points", "Confidence", "Method",
    ]);

    for q in questions {
        let Some(r) = results.get(&q.id) else {
            continue;
        };
        let verdict = if r.ungraded.is_some() {
            "UNGRADED"
        } else if r.is_correct {
            "CORRECT"
        } else {
            "WRONG"
        };
        table.add_row(vec![
            Cell::new(&q.id),
            Cell::new(r.selected_option.trim()),
            Cell::new(&r.correct_option),
            Cell::new(verdict),
            Cell::new(format!("{}/{}", r.points_earned, r.points_possible)),
            Cell::new(format!("{:.2}", r.confidence)),
            Cell::new(r.method.map(|m| m.to_string()).unwrap_or_else(|| "-".into())),
        ]);
    }

    println!("{table}");
}
