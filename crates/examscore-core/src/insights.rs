//! Strength / weakness synthesis and hiring recommendation extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::{category_performance, QuestionAnalysis};
use crate::model::ExamResult;
use crate::report::ReportConfig;
use crate::skills::{GapLevel, SkillGap};

/// Narrative findings attached to a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Build strengths, weaknesses and recommendations from the per-question
/// analysis and the skill gaps.
pub fn generate_insights(
    analysis: &[QuestionAnalysis],
    gaps: &[SkillGap],
    config: &ReportConfig,
) -> Insights {
    let mut insights = Insights::default();

    for (category, score) in category_performance(analysis) {
        if score >= config.strength_threshold {
            insights
                .strengths
                .push(format!("Strong performance in {category} questions"));
        } else if score < config.weakness_threshold {
            insights
                .weaknesses
                .push(format!("Needs improvement in {category} questions"));
        }
    }

    for gap in gaps {
        if gap.level == GapLevel::Critical {
            insights.weaknesses.push(format!(
                "Critical gap in {} ({}% vs required {}%)",
                gap.skill, gap.current_level, gap.required_level
            ));
        }
        insights
            .recommendations
            .extend(gap.recommendations.iter().cloned());
    }

    let correct = analysis.iter().filter(|q| q.is_correct).count();
    let incorrect = analysis.len() - correct;
    if correct > incorrect {
        insights
            .strengths
            .push("Demonstrates good understanding of core concepts".to_string());
    } else {
        insights
            .weaknesses
            .push("Needs to strengthen fundamental knowledge".to_string());
        insights
            .recommendations
            .push("Focus on core concepts before advancing to complex topics".to_string());
    }

    insights
}

/// Verdict derived from the overall percentage when no AI decision exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiringVerdict {
    Hire,
    Interview,
    Reject,
}

impl HiringVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            HiringVerdict::Hire => "hire",
            HiringVerdict::Interview => "interview",
            HiringVerdict::Reject => "reject",
        }
    }
}

impl fmt::Display for HiringVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hiring recommendation as shown in a report.
///
/// `recommendation` is free text because AI decisions are passed through
/// unchanged; fallback values are always a [`HiringVerdict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringRecommendation {
    pub recommendation: String,
    pub confidence: f64,
    pub reasoning: String,
    /// Whether the recommendation came from the AI evaluation.
    #[serde(default)]
    pub from_ai: bool,
}

const DEFAULT_AI_CONFIDENCE: f64 = 0.5;
const FALLBACK_CONFIDENCE: f64 = 0.7;

/// Use the AI hiring decision if the result carries one, otherwise fall
/// back to a verdict based on the overall percentage.
pub fn extract_hiring_recommendation(
    result: &ExamResult,
    config: &ReportConfig,
) -> HiringRecommendation {
    let decision = result
        .hiring_recommendations
        .as_ref()
        .and_then(|h| h.hiring_decision.as_ref());

    if let Some(decision) = decision {
        return HiringRecommendation {
            recommendation: decision.recommendation.clone(),
            confidence: decision
                .confidence
                .filter(|c| *c != 0.0)
                .unwrap_or(DEFAULT_AI_CONFIDENCE),
            reasoning: decision
                .reasoning
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "No specific reasoning provided".to_string()),
            from_ai: true,
        };
    }

    let verdict = if result.percentage >= config.hire_threshold {
        HiringVerdict::Hire
    } else if result.percentage >= config.interview_threshold {
        HiringVerdict::Interview
    } else {
        HiringVerdict::Reject
    };

    HiringRecommendation {
        recommendation: verdict.to_string(),
        confidence: FALLBACK_CONFIDENCE,
        reasoning: format!("Based on overall performance of {}%", result.percentage),
        from_ai: false,
    }
}
