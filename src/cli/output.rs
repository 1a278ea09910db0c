//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Delve CLI.

use crate::types::{Report, SearchStatus};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Delve banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                r#"
   {}
   {}
   {}
   {}
"#,
                " ___  ___ _ __   _____ ".bright_cyan().bold(),
                "|   \\| __| |\\ \\ / / __|".bright_cyan().bold(),
                "| |) | _|| |_\\ V /| _| ".cyan().bold(),
                "|___/|___|____\\_/ |___|".blue().bold(),
            );
            println!(
                "   {} {}\n",
                "Question in, cited report out".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                r#"
 ___  ___ _ __   _____
|   \| __| |\ \ / / __|
| |) | _|| |_\ V /| _|
|___/|___|____\_/ |___|

   Question in, cited report out v{}
"#,
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a step message (for multi-step operations)
    pub fn step(&self, step_num: u32, total: u32, message: &str) {
        if self.colored {
            println!(
                "  {} {}",
                format!("[{}/{}]", step_num, total).dimmed(),
                message.bright_white()
            );
        } else {
            println!("  [{}/{}] {}", step_num, total, message);
        }
    }

    /// Print the outcome of one finished search
    pub fn search_status(&self, status: &SearchStatus, done: usize, total: usize) {
        let progress = format!("({}/{})", done, total);
        if self.colored {
            if status.succeeded {
                println!(
                    "    {} {} {} {}",
                    "✓".green(),
                    progress.dimmed(),
                    status.query,
                    format!("[{} citations]", status.citation_count).dimmed()
                );
            } else {
                println!(
                    "    {} {} {} {}",
                    "✗".red(),
                    progress.dimmed(),
                    status.query,
                    "[failed]".red()
                );
            }
        } else if status.succeeded {
            println!(
                "    [OK] {} {} [{} citations]",
                progress, status.query, status.citation_count
            );
        } else {
            println!("    [FAILED] {} {}", progress, status.query);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a numbered list item
    pub fn numbered(&self, index: usize, item: &str) {
        if self.colored {
            println!("    {} {}", format!("{}.", index).cyan(), item);
        } else {
            println!("    {}. {}", index, item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print a prompt without a trailing newline
    pub fn prompt(&self, message: &str) {
        if self.colored {
            print!("  {} {} ", "?".bright_yellow().bold(), message.bright_white());
        } else {
            print!("  [?] {} ", message);
        }
        io::stdout().flush().ok();
    }

    /// Print a full research report
    pub fn report(&self, report: &Report) {
        self.header("Research Report");

        self.subheader("Executive Summary");
        println!("{}", report.executive_summary);

        self.subheader("Key Findings");
        for (i, finding) in report.key_findings.iter().enumerate() {
            self.numbered(i + 1, finding);
        }

        self.subheader("Detailed Report");
        println!("{}", report.markdown_body);

        self.subheader("Follow-up Questions");
        for (i, question) in report.follow_up_questions.iter().enumerate() {
            self.numbered(i + 1, question);
        }

        self.subheader("Sources");
        for (i, source) in report.sources.iter().enumerate() {
            self.numbered(i + 1, &source.title);
            self.kv("url", &source.url);
            if let Some(description) = &source.description {
                self.kv("note", description);
            }
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportSource;

    #[test]
    fn test_output_new() {
        let output = Output::new();
        assert!(output.colored);
    }

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
    }

    #[test]
    fn test_output_default() {
        let output = Output::default();
        assert!(output.colored);
    }

    fn sample_report() -> Report {
        Report {
            executive_summary: "Summary".to_string(),
            markdown_body: "# Body".to_string(),
            key_findings: vec!["one".to_string(), "two".to_string()],
            follow_up_questions: vec!["next?".to_string()],
            sources: vec![ReportSource {
                url: "https://a.example".to_string(),
                title: "A".to_string(),
                description: Some("Research source".to_string()),
            }],
        }
    }

    #[test]
    fn test_output_methods_no_panic() {
        let output = Output::no_color();
        let ok = SearchStatus {
            task_index: 0,
            query: "solar".to_string(),
            succeeded: true,
            citation_count: 2,
        };
        let failed = SearchStatus {
            succeeded: false,
            citation_count: 0,
            ..ok.clone()
        };

        output.banner();
        output.success("test success");
        output.info("test info");
        output.warning("test warning");
        output.error("test error");
        output.step(1, 4, "step message");
        output.search_status(&ok, 1, 2);
        output.search_status(&failed, 2, 2);
        output.created("file", "path/to/file");
        output.skipped("path", "reason");
        output.header("Test Header");
        output.subheader("Test Subheader");
        output.kv("key", "value");
        output.list_item("item");
        output.numbered(1, "item");
        output.hint("hint message");
        output.command("some command");
        output.complete("complete message");
        output.report(&sample_report());
        output.newline();
    }

    #[test]
    fn test_output_methods_colored_no_panic() {
        let output = Output::new();
        output.banner();
        output.report(&sample_report());
        output.prompt("continue?");
        output.newline();
    }
}
