//! Interactive research loop and one-shot runs.

use super::output::Output;
use super::progress::CliProgress;
use super::report_file::save_report;
use crate::research::{ResearchCoordinator, ResearchRun};
use crate::types::Result;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const EXAMPLE_QUESTIONS: [&str; 6] = [
    "What are the latest developments in artificial intelligence?",
    "How is climate change affecting global food security?",
    "What are the current trends in renewable energy adoption?",
    "What is the impact of remote work on productivity?",
    "What are the newest treatments for diabetes?",
    "How is blockchain technology being used in supply chains?",
];

const TIPS: [&str; 3] = [
    "Ask specific, focused questions for better results",
    "Questions about current events and trends work best",
    "The more specific your question, the more targeted the research",
];

/// One line of REPL input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Help,
    Blank,
    Question(String),
}

impl ReplCommand {
    /// Commands are matched case-insensitively after trimming
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ReplCommand::Blank
        } else if trimmed.eq_ignore_ascii_case("exit") {
            ReplCommand::Exit
        } else if trimmed.eq_ignore_ascii_case("help") {
            ReplCommand::Help
        } else {
            ReplCommand::Question(trimmed.to_string())
        }
    }
}

pub fn print_help(output: &Output) {
    output.subheader("Example Research Questions");
    for question in EXAMPLE_QUESTIONS {
        output.list_item(&format!("\"{}\"", question));
    }
    output.subheader("Tips");
    for tip in TIPS {
        output.list_item(tip);
    }
    output.newline();
}

/// Run a single question with progress output and print the report.
///
/// When `save_dir` is given the report is also written there as Markdown.
pub async fn ask(
    coordinator: &ResearchCoordinator,
    output: &Output,
    question: &str,
    save_dir: Option<&Path>,
) -> Result<ResearchRun> {
    output.header("Starting research");
    output.kv("question", question);
    output.newline();

    let progress = CliProgress::new(output);
    let run = coordinator.run(question, &progress).await?;

    output.report(&run.report);
    output.success(&format!(
        "Research completed in {:.1} seconds ({}/{} searches succeeded)",
        run.timings.total_ms as f64 / 1000.0,
        run.succeeded_searches(),
        run.searches.len()
    ));

    if let Some(dir) = save_dir {
        save_and_report(output, dir, &run);
    }

    Ok(run)
}

/// Read questions from `input` until `exit` or end of input.
///
/// A failed run is printed and the loop continues; only I/O errors on
/// `input` end the loop early.
pub async fn run<R>(
    input: R,
    coordinator: &ResearchCoordinator,
    output: &Output,
    report_dir: &Path,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    output.info("Ask me any question and I will research it thoroughly for you!");

    loop {
        output.newline();
        output.info("What would you like me to research?");
        output.hint("Type \"exit\" to quit, \"help\" for examples");
        output.prompt("Your question:");

        let Some(line) = lines.next_line().await? else {
            output.newline();
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Exit => {
                output.info("Goodbye! Thanks for using Delve.");
                break;
            }
            ReplCommand::Help => print_help(output),
            ReplCommand::Blank => output.warning("Please enter a research question."),
            ReplCommand::Question(question) => {
                let run = match ask(coordinator, output, &question, None).await {
                    Ok(run) => run,
                    Err(e) => {
                        output.error("An error occurred during research:");
                        output.error(&e.to_string());
                        continue;
                    }
                };

                output.prompt("Would you like to save this report as a markdown file? (y/n):");
                let answer = lines.next_line().await?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") {
                    save_and_report(output, report_dir, &run);
                }
            }
        }
    }

    Ok(())
}

fn save_and_report(output: &Output, dir: &Path, run: &ResearchRun) {
    match save_report(dir, &run.report, &run.question) {
        Ok(path) => output.success(&format!("Report saved as: {}", path.display())),
        Err(e) => output.error(&format!("Failed to save report: {}", e)),
    }
}
