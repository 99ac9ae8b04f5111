//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use examscore_core::model::{EvaluationStatus, QuestionCategory};
use examscore_core::report::Report;
use examscore_core::skills::GapLevel;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn push_list(html: &mut String, title: &str, class: &str, items: &[String]) {
    html.push_str(&format!("<div class=\"insight {class}\">\n<h3>{title}</h3>\n"));
    if items.is_empty() {
        html.push_str("<p class=\"meta\">None</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in items {
            html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
}

/// Generate an HTML page from a candidate report.
pub fn generate_html(report: &Report) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Exam report: {}</title>\n",
        html_escape(&report.candidate.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{}</h1>\n",
        html_escape(&report.candidate.name)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} ({}) | session {} | {} | v{}</p>\n",
        html_escape(&report.job_description.title),
        html_escape(&report.candidate.email),
        html_escape(&report.session_id),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        html_escape(&report.evaluation_version),
    ));
    html.push_str("</header>\n");

    // Summary
    let status_class = match report.evaluation_status {
        EvaluationStatus::Passed => "pass",
        EvaluationStatus::Failed => "fail",
        EvaluationStatus::Pending => "warn",
    };
    let hiring = &report.hiring_recommendation;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Score</th><td>{} / {} ({:.1}%)</td></tr>\n",
        report.overall_score, report.max_score, report.percentage
    ));
    html.push_str(&format!(
        "<tr><th>Status</th><td class=\"{status_class}\">{}</td></tr>\n",
        report.evaluation_status
    ));
    html.push_str(&format!(
        "<tr><th>Recommendation</th><td><strong>{}</strong> ({:.0}% confidence{})<br>{}</td></tr>\n",
        html_escape(&hiring.recommendation),
        hiring.confidence * 100.0,
        if hiring.from_ai { ", AI" } else { "" },
        html_escape(&hiring.reasoning)
    ));
    html.push_str(&format!(
        "<tr><th>Multiple choice</th><td>{}/{} correct, {} / {} points ({}%), avg {}s per question</td></tr>\n",
        report.mcq_results.correct_answers,
        report.mcq_results.total_questions,
        report.mcq_results.score,
        report.mcq_results.max_score,
        report.mcq_results.percentage,
        report.mcq_results.average_time_per_question,
    ));
    html.push_str(&format!(
        "<tr><th>Text</th><td>{} questions, {} / {} points ({}%), AI confidence {:.2}</td></tr>\n",
        report.text_results.total_questions,
        report.text_results.total_score,
        report.text_results.max_score,
        report.text_results.percentage,
        report.text_results.average_confidence,
    ));
    html.push_str(&format!(
        "<tr><th>Processing time</th><td>{}ms</td></tr>\n",
        report.processing_time_ms
    ));
    html.push_str("</tbody></table>\n");

    if !report.category_performance.is_empty() {
        html.push_str("<h3>Category performance</h3>\n");
        html.push_str(&generate_bar_chart(&report.category_performance));
    }
    html.push_str("</section>\n");

    // Skill gaps
    html.push_str("<section class=\"gaps\">\n");
    html.push_str("<h2>Skill gaps</h2>\n");
    if report.skill_gaps.is_empty() {
        html.push_str("<p class=\"meta\">All required skills meet the expected level.</p>\n");
    } else {
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>Skill</th><th>Level</th><th>Current</th><th>Required</th><th>Recommendations</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for gap in &report.skill_gaps {
            let class = match gap.level {
                GapLevel::Critical => "fail",
                GapLevel::Important => "warn",
                GapLevel::NiceToHave => "pass",
            };
            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}%</td><td>{}%</td><td>{}</td></tr>\n",
                html_escape(&gap.skill),
                class,
                gap.level,
                gap.current_level,
                gap.required_level,
                html_escape(&gap.recommendations.join("; ")),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Insights
    html.push_str("<section class=\"insights\">\n");
    html.push_str("<h2>Insights</h2>\n");
    push_list(&mut html, "Strengths", "pass", &report.strengths);
    push_list(&mut html, "Weaknesses", "fail", &report.weaknesses);
    push_list(&mut html, "Recommendations", "", &report.recommendations);
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Type</th><th onclick=\"sortTable(2)\">Category</th><th onclick=\"sortTable(3)\">Difficulty</th><th onclick=\"sortTable(4)\">Answer</th><th onclick=\"sortTable(5)\">Points</th><th onclick=\"sortTable(6)\">Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for q in &report.question_analysis {
        let class = if q.is_correct { "pass" } else { "fail" };
        let kind = q
            .question_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let time = q
            .time_taken
            .map(|t| format!("{t}s"))
            .unwrap_or_else(|| "-".to_string());
        let title = match &q.feedback {
            Some(feedback) if !feedback.overall.is_empty() => {
                format!(" title=\"{}\"", html_escape(&feedback.overall))
            }
            _ => String::new(),
        };

        html.push_str(&format!(
            "<tr class=\"{}\"{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}/{}</td><td>{}</td></tr>\n",
            class,
            title,
            html_escape(&q.question_text),
            kind,
            q.category,
            q.difficulty,
            html_escape(&q.candidate_answer),
            q.points_earned,
            q.points,
            time,
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &Report, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(categories: &BTreeMap<QuestionCategory, u32>) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let total_height = categories.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (category, score)) in categories.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (*score).min(100) as usize * max_width / 100;

        let color = if *score >= 80 {
            "#22c55e"
        } else if *score >= 50 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            category
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --warn: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --warn: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); }
.results-table th { cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.warn { background: var(--warn); }
.insights { display: flex; flex-wrap: wrap; gap: 1rem; }
.insights h2 { flex-basis: 100%; }
.insight { flex: 1 1 16rem; border: 1px solid var(--border); border-radius: 8px; padding: 0 1rem; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
