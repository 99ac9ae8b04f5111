//! Markdown report generator, for pasting into tickets and pull requests.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use examscore_core::report::Report;

/// Make a value safe inside a Markdown table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn bullet_list(md: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(md, "### {title}\n");
    if items.is_empty() {
        md.push_str("_None_\n\n");
        return;
    }
    for item in items {
        let _ = writeln!(md, "- {item}");
    }
    md.push('\n');
}

/// Generate a Markdown document from a candidate report.
pub fn generate_markdown(report: &Report) -> String {
    let mut md = String::new();
    let hiring = &report.hiring_recommendation;

    let _ = writeln!(md, "# Exam report: {}\n", report.candidate.name);
    let _ = writeln!(
        md,
        "{} | {} | session `{}` | {}\n",
        report.job_description.title,
        report.candidate.email,
        report.session_id,
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
    );

    md.push_str("## Summary\n\n");
    md.push_str("| | |\n|---|---|\n");
    let _ = writeln!(
        md,
        "| Score | {} / {} ({:.1}%) |",
        report.overall_score, report.max_score, report.percentage
    );
    let _ = writeln!(md, "| Status | {} |", report.evaluation_status);
    let _ = writeln!(
        md,
        "| Recommendation | **{}** ({:.0}% confidence) |",
        cell(&hiring.recommendation),
        hiring.confidence * 100.0
    );
    let _ = writeln!(
        md,
        "| Multiple choice | {}/{} correct, {}% |",
        report.mcq_results.correct_answers,
        report.mcq_results.total_questions,
        report.mcq_results.percentage
    );
    let _ = writeln!(
        md,
        "| Text | {} questions, {}%, AI confidence {:.2} |",
        report.text_results.total_questions,
        report.text_results.percentage,
        report.text_results.average_confidence
    );
    let _ = writeln!(md, "\n> {}\n", hiring.reasoning);

    if !report.category_performance.is_empty() {
        md.push_str("## Category performance\n\n| Category | Score |\n|---|---:|\n");
        for (category, score) in &report.category_performance {
            let _ = writeln!(md, "| {category} | {score}% |");
        }
        md.push('\n');
    }

    md.push_str("## Skill gaps\n\n");
    if report.skill_gaps.is_empty() {
        md.push_str("All required skills meet the expected level.\n\n");
    } else {
        md.push_str("| Skill | Level | Current | Required |\n|---|---|---:|---:|\n");
        for gap in &report.skill_gaps {
            let _ = writeln!(
                md,
                "| {} | {} | {}% | {}% |",
                cell(&gap.skill),
                gap.level,
                gap.current_level,
                gap.required_level
            );
        }
        md.push('\n');
    }

    md.push_str("## Insights\n\n");
    bullet_list(&mut md, "Strengths", &report.strengths);
    bullet_list(&mut md, "Weaknesses", &report.weaknesses);
    bullet_list(&mut md, "Recommendations", &report.recommendations);

    md.push_str("## Questions\n\n");
    md.push_str("| # | Question | Category | Answer | Points | Result |\n|---:|---|---|---|---:|---|\n");
    for (i, q) in report.question_analysis.iter().enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {}/{} | {} |",
            i + 1,
            cell(&q.question_text),
            q.category,
            cell(&q.candidate_answer),
            q.points_earned,
            q.points,
            if q.is_correct { "correct" } else { "incorrect" },
        );
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &Report, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write Markdown report to {}", path.display()))
}
