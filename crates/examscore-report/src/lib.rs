//! examscore-report: Candidate report rendering.
//!
//! Renders [`examscore_core::report::Report`] as a self-contained HTML page
//! or as Markdown. JSON output lives on the report type itself.

pub mod html;
pub mod markdown;

#[cfg(test)]
mod fixtures;

pub use html::{generate_html, write_html_report};
pub use markdown::{generate_markdown, write_markdown_report};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format for a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}
