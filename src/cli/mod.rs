//! CLI module for Delve
//!
//! Provides command-line interface parsing and handling for the `delve` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod progress;
pub mod repl;
pub mod report_file;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Delve - turns a research question into a structured, cited report
#[derive(Parser, Debug)]
#[command(
    name = "delve",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Delve - question in, cited research report out",
    long_about = "Plans a set of web searches for a research question, runs them in parallel,\n\
                  and synthesizes the findings into a structured report with sources.\n\n\
                  Run without arguments for an interactive session.",
    after_help = "EXAMPLES:\n    \
                  delve                                  # Interactive session\n    \
                  delve ask \"How do heat pumps work?\"    # One-shot research\n    \
                  delve ask --save \"...\"                 # ...and save as Markdown\n    \
                  delve serve --port 8080                # Start the HTTP API\n    \
                  delve init                             # Scaffold delve.toml"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "delve.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory where saved reports are written
    #[arg(long, default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive research session (the default)
    Chat,

    /// Research a single question and exit
    Ask {
        /// The research question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Save the report as Markdown without asking
        #[arg(short, long)]
        save: bool,
    },

    /// Run the HTTP API server
    Serve {
        /// Host address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create delve.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Take the subcommand out, with no subcommand meaning an interactive session
    pub fn take_command(&mut self) -> Commands {
        self.command.take().unwrap_or(Commands::Chat)
    }
}

/// Join the words of a multi-word `ask` argument
pub fn join_question(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}
