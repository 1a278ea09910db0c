//! Markdown persistence of finished reports.

use crate::types::Report;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// `report_2024-05-01-13-45-09-123Z.md` for the given instant
pub fn report_filename(now: DateTime<Utc>) -> String {
    format!("report_{}.md", now.format("%Y-%m-%d-%H-%M-%S-%3fZ"))
}

/// Render the report as a standalone Markdown document.
pub fn render_markdown(report: &Report, question: &str, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    let _ = write!(
        md,
        "# Research Report\n\n\
         **Research Question:** {}\n\
         **Generated:** {}\n\
         **Research Agent:** AI-Powered Research Assistant\n\n\
         ---\n\n\
         ## Executive Summary\n\n\
         {}\n\n\
         ---\n\n\
         ## Key Findings\n\n",
        question,
        generated_at.format("%B %-d, %Y at %I:%M %p UTC"),
        report.executive_summary
    );
    md.push_str(&numbered(&report.key_findings));

    let _ = write!(md, "\n\n---\n\n{}\n\n---\n\n## Follow-up Questions\n\n", report.markdown_body);
    md.push_str(&numbered(&report.follow_up_questions));

    md.push_str("\n\n---\n\n## Sources\n\n");
    let sources = report
        .sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let mut entry = format!("{}. [{}]({})", i + 1, source.title, source.url);
            if let Some(description) = source.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = write!(entry, "\n   - {}", description);
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    md.push_str(&sources);

    md.push_str("\n\n---\n\n*Report generated by AI Research Agent*\n");
    md
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the rendered report into `dir`, creating it if needed.
///
/// Returns the path of the new file.
pub fn save_report(dir: &Path, report: &Report, question: &str) -> std::io::Result<PathBuf> {
    let now = Utc::now();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_filename(now));
    std::fs::write(&path, render_markdown(report, question, now))?;
    Ok(path)
}
