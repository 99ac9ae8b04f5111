//! The `examscore report` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use examscore_core::report::{Report, ReportAggregator};
use examscore_report::{write_html_report, write_markdown_report, ReportFormat};
use examscore_store::config::{load_config_from, open_json_store, StoreConfig};

pub async fn execute(
    sessions: String,
    data: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;

    if let Some(path) = data {
        config.store = if path.is_dir() {
            StoreConfig::JsonDir { path }
        } else {
            StoreConfig::Json { path }
        };
    }

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let formats = parse_formats(&format)?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let store = Arc::new(open_json_store(&config.store)?);

    let session_ids: Vec<String> = if sessions.trim() == "all" {
        store.session_ids().await?
    } else {
        sessions
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };
    anyhow::ensure!(!session_ids.is_empty(), "no sessions to report on");

    let aggregator = ReportAggregator::new(store)
        .with_config(config.report.clone())
        .with_skills(config.skill_table());

    eprintln!(
        "examscore v{}: generating {} report(s) from {}",
        env!("CARGO_PKG_VERSION"),
        session_ids.len(),
        config.store.path().display()
    );

    let start = Instant::now();
    let outcomes = aggregator.generate_reports(&session_ids, parallelism).await;

    let mut reports = Vec::new();
    let mut failed = 0;
    for (session_id, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                write_outputs(&report, &formats, &output)?;
                reports.push(report);
            }
            Err(e) => {
                eprintln!("  ERROR: {session_id}: {e}");
                failed += 1;
            }
        }
    }

    if !reports.is_empty() {
        print_summary(&reports);
    }
    eprintln!(
        "\nComplete: {}/{} succeeded, {} failed ({:.1}s)",
        reports.len(),
        session_ids.len(),
        failed,
        start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {} report(s) failed", session_ids.len());
    }
    Ok(())
}

fn parse_formats(format: &str) -> Result<Vec<ReportFormat>> {
    if format == "all" {
        return Ok(vec![
            ReportFormat::Json,
            ReportFormat::Html,
            ReportFormat::Markdown,
        ]);
    }
    format
        .split(',')
        .map(|s| s.trim().parse::<ReportFormat>().map_err(anyhow::Error::msg))
        .collect()
}

/// Session ids come from the data export, so keep file names tame.
fn file_stem(session_id: &str) -> String {
    session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_outputs(report: &Report, formats: &[ReportFormat], output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let stem = file_stem(&report.session_id);

    for fmt in formats {
        let path = output.join(format!("{stem}.{}", fmt.extension()));
        match fmt {
            ReportFormat::Json => {
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            ReportFormat::Html => {
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            ReportFormat::Markdown => {
                write_markdown_report(report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
        }
    }
    Ok(())
}

fn print_summary(reports: &[Report]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Session",
        "Candidate",
        "Score",
        "Status",
        "Skill gaps",
        "Recommendation",
        "Time",
    ]);

    for report in reports {
        table.add_row(vec![
            Cell::new(&report.session_id),
            Cell::new(&report.candidate.name),
            Cell::new(format!(
                "{}/{} ({:.1}%)",
                report.overall_score, report.max_score, report.percentage
            )),
            Cell::new(report.evaluation_status.to_string()),
            Cell::new(report.skill_gaps.len()),
            Cell::new(format!(
                "{} ({:.0}%)",
                report.hiring_recommendation.recommendation,
                report.hiring_recommendation.confidence * 100.0
            )),
            Cell::new(format!("{}ms", report.processing_time_ms)),
        ]);
    }

    eprintln!("\n{table}");
}
