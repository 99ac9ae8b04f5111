//! Evaluation statistics, session result summaries, and adaptive-testing
//! performance metrics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evaluator::EvaluationResult;
use crate::model::{Difficulty, EvaluationStatus, ExamSession, QuestionCategory, Response};

/// Default pass mark for a session, as a percentage.
pub const DEFAULT_PASS_THRESHOLD: f64 = 60.0;

/// Integer percentage `round(part / whole * 100)`, 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate view of a batch of evaluation results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Sum of the questions' point values.
    pub total_points: u32,
    pub earned_points: u32,
    pub average_confidence: f64,
    /// Fraction of correct answers, in `[0, 1]`.
    pub accuracy_rate: f64,
}

/// Summarize a map of evaluation results.
pub fn evaluation_stats(results: &BTreeMap<String, EvaluationResult>) -> EvaluationStats {
    let total_questions = results.len();
    if total_questions == 0 {
        return EvaluationStats::default();
    }

    let correct_answers = results.values().filter(|r| r.is_correct).count();
    let total_points = results.values().map(|r| r.points_possible).sum();
    let earned_points = results.values().map(|r| r.points_earned).sum();
    let confidence_sum: f64 = results.values().map(|r| r.confidence).sum();

    EvaluationStats {
        total_questions,
        correct_answers,
        total_points,
        earned_points,
        average_confidence: confidence_sum / total_questions as f64,
        accuracy_rate: correct_answers as f64 / total_questions as f64,
    }
}

/// Result totals recomputed from a session's responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub skipped_questions: u32,
    pub technical_score: u32,
    pub aptitude_score: u32,
    pub evaluation_status: EvaluationStatus,
}

/// Compute the result totals for a completed session.
///
/// `total_score` is the plain sum of `points_earned`, so it always agrees
/// with the responses it was computed from.
pub fn summarize_session(
    responses: &[Response],
    total_questions: u32,
    pass_threshold: f64,
) -> SessionSummary {
    let total_score: u32 = responses.iter().map(|r| r.points_earned).sum();
    let max_score: u32 = responses.iter().map(Response::max_points).sum();
    let correct_answers = responses.iter().filter(|r| r.is_correct).count() as u32;
    let answered = responses.len() as u32;
    let percentage = percent(total_score, max_score);

    let category_score = |category: QuestionCategory| -> u32 {
        responses
            .iter()
            .filter(|r| {
                r.question
                    .as_ref()
                    .is_some_and(|q| q.question_category == category)
            })
            .map(|r| r.points_earned)
            .sum()
    };

    let evaluation_status = if percentage as f64 >= pass_threshold {
        EvaluationStatus::Passed
    } else {
        EvaluationStatus::Failed
    };

    SessionSummary {
        total_score,
        max_score,
        percentage,
        correct_answers,
        wrong_answers: answered - correct_answers,
        skipped_questions: total_questions.saturating_sub(answered),
        technical_score: category_score(QuestionCategory::Technical),
        aptitude_score: category_score(QuestionCategory::Aptitude),
        evaluation_status,
    }
}

/// In-progress performance used to decide on adaptive questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub accuracy_rate: f64,
    pub average_time_per_question: f64,
    pub questions_answered: u32,
    pub correct_answers: u32,
    /// Minutes left in the session; negative once overdue.
    pub time_remaining: f64,
    pub should_add_questions: bool,
    pub recommended_difficulty: Difficulty,
}

/// Compute adaptive-testing metrics for a running session at time `now`.
///
/// A session that has not started yet is treated as starting at `now`.
pub fn performance_metrics(
    session: &ExamSession,
    responses: &[Response],
    now: DateTime<Utc>,
) -> PerformanceMetrics {
    let questions_answered = responses.len() as u32;
    let correct_answers = responses.iter().filter(|r| r.is_correct).count() as u32;
    let accuracy_rate = if questions_answered > 0 {
        correct_answers as f64 / questions_answered as f64
    } else {
        0.0
    };

    let total_time: u32 = responses
        .iter()
        .map(|r| r.time_taken_seconds.unwrap_or(0))
        .sum();
    let average_time_per_question = if questions_answered > 0 {
        total_time as f64 / questions_answered as f64
    } else {
        0.0
    };

    let started = session.started_at.unwrap_or(now);
    let elapsed_minutes = (now - started).num_seconds() as f64 / 60.0;
    let time_remaining = session.duration_minutes as f64 - elapsed_minutes;

    let should_add_questions = accuracy_rate >= 0.8
        && average_time_per_question < 30.0
        && time_remaining > 10.0
        && session.adaptive_questions_added < session.max_adaptive_questions;

    let recommended_difficulty = if accuracy_rate >= 0.9 {
        Difficulty::Hard
    } else if accuracy_rate >= 0.8 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    };

    PerformanceMetrics {
        accuracy_rate,
        average_time_per_question,
        questions_answered,
        correct_answers,
        time_remaining,
        should_add_questions,
        recommended_difficulty,
    }
}
