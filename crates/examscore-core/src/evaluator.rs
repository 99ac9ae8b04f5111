//! Multiple-choice answer evaluation.
//!
//! An answer is scored by up to three independent matchers (exact, option,
//! fuzzy). The first matcher that accepts the answer decides the verdict;
//! otherwise the most confident rejection wins. Agreement between matchers
//! raises the confidence of the verdict.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::model::{Question, QuestionType};
use crate::similarity::{normalize_answer, similarity};

/// Confidence added when two or more matchers agree with the verdict.
const AGREEMENT_BOOST: f64 = 0.1;

/// Settings recognized by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Compare answers case-sensitively in the exact matcher.
    pub case_sensitive: bool,
    /// Award `round(points * confidence)` for incorrect answers.
    pub allow_partial_credit: bool,
    /// Accepted and stored, but not consulted when scoring.
    pub partial_credit_threshold: f64,
    /// Run the Levenshtein-based fuzzy matcher.
    pub enable_fuzzy_matching: bool,
    /// Minimum similarity for a fuzzy match.
    pub fuzzy_threshold: f64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            allow_partial_credit: false,
            partial_credit_threshold: 0.8,
            enable_fuzzy_matching: false,
            fuzzy_threshold: 0.9,
        }
    }
}

/// Matcher that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactMatch,
    OptionMatch,
    FuzzyMatch,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMethod::ExactMatch => write!(f, "exact_match"),
            MatchMethod::OptionMatch => write!(f, "option_match"),
            MatchMethod::FuzzyMatch => write!(f, "fuzzy_match"),
        }
    }
}

/// Why an answer was not graded by the matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UngradedReason {
    EmptyAnswer,
    MissingCorrectAnswer,
    EvaluationError,
}

/// Which comparisons succeeded for the selected matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub answer_matched: bool,
    pub option_text_matched: bool,
    pub case_insensitive_match: bool,
    pub trimmed_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// Result of evaluating one MCQ answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_correct: bool,
    pub points_earned: u32,
    /// Point value of the question.
    pub points_possible: u32,
    /// The candidate's raw answer.
    pub selected_option: String,
    /// The question's correct answer.
    pub correct_option: String,
    pub explanation: String,
    /// Certainty of the verdict, in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub method: Option<MatchMethod>,
    #[serde(default)]
    pub ungraded: Option<UngradedReason>,
    pub evaluation_details: MatchDetails,
}

impl EvaluationResult {
    fn ungraded(question: &Question, answer: &str, reason: UngradedReason) -> Self {
        let explanation = match reason {
            UngradedReason::EmptyAnswer => "No answer provided",
            UngradedReason::MissingCorrectAnswer => "No correct answer defined",
            UngradedReason::EvaluationError => "Evaluation error",
        };
        Self {
            is_correct: false,
            points_earned: 0,
            points_possible: question.points,
            selected_option: answer.to_string(),
            correct_option: question.correct_answer_trimmed().unwrap_or_default().to_string(),
            explanation: explanation.to_string(),
            confidence: 0.0,
            method: None,
            ungraded: Some(reason),
            evaluation_details: MatchDetails::default(),
        }
    }
}

/// Verdict of a single matcher.
#[derive(Debug, Clone)]
struct MatchOutcome {
    method: MatchMethod,
    is_correct: bool,
    confidence: f64,
    details: MatchDetails,
}

/// Scores MCQ answers with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct AnswerEvaluator {
    options: EvaluationOptions,
}

impl AnswerEvaluator {
    pub fn new(options: EvaluationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Evaluate one answer. See [`evaluate_answer`].
    pub fn evaluate(&self, question: &Question, answer: &str) -> Result<EvaluationResult, EvalError> {
        evaluate_answer(question, answer, &self.options)
    }

    /// Evaluate every MCQ question that has an entry in `answers`.
    ///
    /// A failing item is logged and replaced by a zero-score result; it never
    /// aborts the rest of the batch.
    pub fn batch_evaluate(
        &self,
        questions: &[Question],
        answers: &HashMap<String, String>,
    ) -> BTreeMap<String, EvaluationResult> {
        let mut results = BTreeMap::new();

        for question in questions
            .iter()
            .filter(|q| q.question_type == QuestionType::Mcq)
        {
            let Some(answer) = answers.get(&question.id) else {
                continue;
            };

            let result = match self.evaluate(question, answer) {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("error evaluating question {}: {e}", question.id);
                    EvaluationResult::ungraded(question, answer, UngradedReason::EvaluationError)
                }
            };
            results.insert(question.id.clone(), result);
        }

        results
    }
}

/// Evaluate a candidate's answer to an MCQ question.
///
/// Empty answers and questions without a correct answer yield a zero-score,
/// zero-confidence result rather than an error. Non-MCQ questions are
/// rejected with [`EvalError::InvalidQuestionType`].
pub fn evaluate_answer(
    question: &Question,
    answer: &str,
    options: &EvaluationOptions,
) -> Result<EvaluationResult, EvalError> {
    if question.question_type != QuestionType::Mcq {
        return Err(EvalError::InvalidQuestionType {
            question_id: question.id.clone(),
            found: question.question_type,
        });
    }

    tracing::debug!(
        question_id = %question.id,
        answer_len = answer.len(),
        "evaluating MCQ answer"
    );

    if answer.trim().is_empty() {
        return Ok(EvaluationResult::ungraded(
            question,
            answer,
            UngradedReason::EmptyAnswer,
        ));
    }

    let Some(correct) = question.correct_answer_trimmed() else {
        tracing::warn!("no correct answer defined for question {}", question.id);
        return Ok(EvaluationResult::ungraded(
            question,
            answer,
            UngradedReason::MissingCorrectAnswer,
        ));
    };

    let clean_answer = normalize_answer(answer, options.case_sensitive);
    let clean_correct = normalize_answer(correct, options.case_sensitive);

    let mut outcomes = vec![
        exact_match(&clean_answer, &clean_correct),
        option_match(answer, question),
    ];
    if options.enable_fuzzy_matching {
        outcomes.push(fuzzy_match(&clean_answer, &clean_correct, options.fuzzy_threshold));
    }

    let selected = select_outcome(&outcomes);
    let confidence = blended_confidence(&outcomes, selected);

    let points_earned = if selected.is_correct {
        question.points
    } else if options.allow_partial_credit {
        ((question.points as f64 * confidence).round() as u32).min(question.points)
    } else {
        0
    };

    let result = EvaluationResult {
        is_correct: selected.is_correct,
        points_earned,
        points_possible: question.points,
        selected_option: answer.to_string(),
        correct_option: correct.to_string(),
        explanation: explanation(question, correct, selected.is_correct, confidence),
        confidence,
        method: Some(selected.method),
        ungraded: None,
        evaluation_details: selected.details.clone(),
    };

    tracing::debug!(
        question_id = %question.id,
        is_correct = result.is_correct,
        points = result.points_earned,
        confidence = result.confidence,
        method = %selected.method,
        "MCQ evaluation result"
    );

    Ok(result)
}

fn exact_match(answer: &str, correct: &str) -> MatchOutcome {
    let trimmed_match = answer == correct;
    let case_insensitive_match = answer.to_lowercase() == correct.to_lowercase();

    MatchOutcome {
        method: MatchMethod::ExactMatch,
        is_correct: trimmed_match,
        confidence: if trimmed_match { 1.0 } else { 0.0 },
        details: MatchDetails {
            answer_matched: trimmed_match,
            option_text_matched: false,
            case_insensitive_match,
            trimmed_match,
            similarity: None,
        },
    }
}

fn option_match(answer: &str, question: &Question) -> MatchOutcome {
    let Some(correct_option) = question.correct_option() else {
        return MatchOutcome {
            method: MatchMethod::OptionMatch,
            is_correct: false,
            confidence: 0.0,
            details: MatchDetails::default(),
        };
    };

    let answer = answer.trim().to_lowercase();
    let id_matched = answer == correct_option.option.trim().to_lowercase();
    let text_matched = answer == correct_option.text.trim().to_lowercase();
    let matched = id_matched || text_matched;

    MatchOutcome {
        method: MatchMethod::OptionMatch,
        is_correct: matched,
        confidence: if matched { 1.0 } else { 0.0 },
        details: MatchDetails {
            answer_matched: matched,
            option_text_matched: text_matched,
            case_insensitive_match: true,
            trimmed_match: true,
            similarity: None,
        },
    }
}

fn fuzzy_match(answer: &str, correct: &str, threshold: f64) -> MatchOutcome {
    let score = similarity(answer, correct);
    let matched = score >= threshold;

    MatchOutcome {
        method: MatchMethod::FuzzyMatch,
        is_correct: matched,
        confidence: score,
        details: MatchDetails {
            answer_matched: matched,
            option_text_matched: false,
            case_insensitive_match: true,
            trimmed_match: true,
            similarity: Some(score),
        },
    }
}

/// First accepting matcher in declared order, else the most confident one.
fn select_outcome(outcomes: &[MatchOutcome]) -> &MatchOutcome {
    if let Some(accepted) = outcomes.iter().find(|o| o.is_correct) {
        return accepted;
    }

    let mut best = &outcomes[0];
    for outcome in &outcomes[1..] {
        if outcome.confidence > best.confidence {
            best = outcome;
        }
    }
    best
}

fn blended_confidence(outcomes: &[MatchOutcome], selected: &MatchOutcome) -> f64 {
    let agreeing = outcomes
        .iter()
        .filter(|o| o.is_correct == selected.is_correct)
        .count();

    let mut confidence = selected.confidence;
    if agreeing > 1 {
        confidence = (confidence + AGREEMENT_BOOST).min(1.0);
    }

    ((confidence * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

fn explanation(question: &Question, correct: &str, is_correct: bool, confidence: f64) -> String {
    let extra = question
        .answer_explanation
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    if is_correct {
        return format!(
            "Correct! {}",
            extra.unwrap_or("Your answer matches the correct option.")
        );
    }

    let lead = if confidence > 0.5 {
        "Your answer was close but not quite right."
    } else {
        "Your answer was incorrect."
    };
    match extra {
        Some(extra) => format!("{lead} The correct answer is: {correct}. {extra}"),
        None => format!("{lead} The correct answer is: {correct}."),
    }
}
