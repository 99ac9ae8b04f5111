//! Score rollups and per-question analysis over persisted responses.
//!
//! These functions read `is_correct` / `points_earned` as stored; they never
//! re-evaluate answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Feedback, QuestionCategory, QuestionType, Response};
use crate::statistics::{percent, round2};

/// Rollup of multiple-choice responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McqRollup {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
    /// Rounded seconds.
    pub average_time_per_question: u32,
}

/// Rollup of free-text responses evaluated by the external AI workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRollup {
    pub total_questions: u32,
    pub average_score: f64,
    pub average_confidence: f64,
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

/// One row of the per-question analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub question_id: String,
    pub question_text: String,
    pub question_type: Option<QuestionType>,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    pub points: u32,
    pub candidate_answer: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
    pub points_earned: u32,
    pub is_correct: bool,
    #[serde(default)]
    pub time_taken: Option<u32>,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

fn of_type(responses: &[Response], kind: QuestionType) -> Vec<&Response> {
    responses
        .iter()
        .filter(|r| r.question_type() == Some(kind))
        .collect()
}

/// Roll up the MCQ responses. Empty input gives an all-zero rollup.
pub fn analyze_mcq_performance(responses: &[Response]) -> McqRollup {
    let mcq = of_type(responses, QuestionType::Mcq);
    if mcq.is_empty() {
        return McqRollup::default();
    }

    let total_questions = mcq.len() as u32;
    let score: u32 = mcq.iter().map(|r| r.points_earned).sum();
    let max_score: u32 = mcq.iter().map(|r| r.max_points()).sum();
    let total_time: u32 = mcq.iter().map(|r| r.time_taken_seconds.unwrap_or(0)).sum();

    McqRollup {
        total_questions,
        correct_answers: mcq.iter().filter(|r| r.is_correct).count() as u32,
        score,
        max_score,
        percentage: percent(score, max_score),
        average_time_per_question: (total_time as f64 / total_questions as f64).round() as u32,
    }
}

/// Roll up the text responses. Empty input gives an all-zero rollup.
///
/// Responses without an AI confidence are left out of the confidence
/// average but still count towards the scores.
pub fn analyze_text_performance(responses: &[Response]) -> TextRollup {
    let text = of_type(responses, QuestionType::Text);
    if text.is_empty() {
        return TextRollup::default();
    }

    let total_questions = text.len() as u32;
    let total_score: u32 = text.iter().map(|r| r.points_earned).sum();
    let max_score: u32 = text.iter().map(|r| r.max_points()).sum();

    let confidences: Vec<f64> = text
        .iter()
        .filter_map(|r| r.evaluation_details.as_ref()?.ai_confidence())
        .collect();
    let average_confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    TextRollup {
        total_questions,
        average_score: total_score as f64 / total_questions as f64,
        average_confidence: round2(average_confidence),
        total_score,
        max_score,
        percentage: percent(total_score, max_score),
    }
}

/// One analysis row per response, in response order.
pub fn analyze_questions(responses: &[Response]) -> Vec<QuestionAnalysis> {
    responses
        .iter()
        .map(|response| {
            let question = response.question.as_ref();
            QuestionAnalysis {
                question_id: response.question_id.clone(),
                question_text: question.map(|q| q.question_text.clone()).unwrap_or_default(),
                question_type: question.map(|q| q.question_type),
                category: question.map(|q| q.question_category).unwrap_or_default(),
                difficulty: question.map(|q| q.difficulty_level).unwrap_or_default(),
                points: response.max_points(),
                candidate_answer: response.answer_text.clone().unwrap_or_default(),
                correct_answer: question.and_then(|q| q.correct_answer.clone()),
                points_earned: response.points_earned,
                is_correct: response.is_correct,
                time_taken: response.time_taken_seconds,
                feedback: response
                    .evaluation_details
                    .as_ref()
                    .and_then(|d| d.feedback().cloned()),
            }
        })
        .collect()
}

/// Percentage earned per category.
///
/// Categories whose questions carry no points are omitted rather than
/// reported as 0%.
pub fn category_performance(analysis: &[QuestionAnalysis]) -> BTreeMap<QuestionCategory, u32> {
    let mut totals: BTreeMap<QuestionCategory, (u32, u32)> = BTreeMap::new();
    for q in analysis {
        let entry = totals.entry(q.category).or_default();
        entry.0 += q.points_earned;
        entry.1 += q.points;
    }

    totals
        .into_iter()
        .filter(|(_, (_, max))| *max > 0)
        .map(|(category, (earned, max))| (category, percent(earned, max)))
        .collect()
}
