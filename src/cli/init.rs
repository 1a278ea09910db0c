//! Init command implementation
//!
//! Scaffolds a Delve working directory with a config file and env template.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// delve.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Delve");

    let base_path = &config.path;
    let config_path = base_path.join("delve.toml");
    if config_path.exists() && !config.force {
        output.warning("delve.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    output.subheader("Creating configuration files");

    if let Err(e) = write_file(&config_path, &generate_delve_toml(), config.force) {
        output.error(&format!("Failed to create delve.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "delve.toml");

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("env", ".env.example");
    }

    output.complete("Delve initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set OPENAI_API_KEY");
    output.newline();
    output.info("2. Ask a question interactively:");
    output.command("delve");
    output.newline();
    output.info("3. Or start the HTTP server:");
    output.command("delve serve");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_delve_toml() -> String {
    r#"# Delve configuration
# Every value below is the built-in default; delete what you don't change.

[server]
host = "127.0.0.1"
port = 3000
log_level = "info"
# "text" or "json"
log_format = "text"

[provider]
# Name of the environment variable holding the API key
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
# Model used for planning and report writing
model = "gpt-4o-mini"
# Model used for web searches
search_model = "gpt-4o-mini"
# "low", "medium" or "high"
search_context_size = "medium"
user_location_country = "US"
timeout_secs = 120

[research]
# Search bodies are cut to this many characters before synthesis
body_char_limit = 800
ellipsis = "..."
# Description given to sources filled in from search citations
placeholder_description = "Research source"
"#
    .to_string()
}

fn generate_env_example() -> String {
    r#"# Delve environment
OPENAI_API_KEY=sk-your-key-here

# Logging (overrides server.log_level)
RUST_LOG=info
"#
    .to_string()
}
