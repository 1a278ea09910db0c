//! # Delve
//!
//! Turns a natural-language research question into a structured, cited report.
//!
//! ## Overview
//!
//! A run has three stages:
//!
//! 1. **Planning** - the question is decomposed into a list of targeted web searches
//! 2. **Searching** - every search runs concurrently; failures degrade to empty results
//! 3. **Synthesis** - findings are deduplicated, truncated and written up as a [`Report`]
//!
//! Delve can be used in two ways:
//!
//! 1. **As a standalone binary** - interactive CLI, one-shot `ask`, or `serve` for HTTP
//! 2. **As a library** - build a [`ResearchCoordinator`] over your own generators
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use delve::{DelveConfig, OpenAIClient, ResearchCoordinator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DelveConfig::load_or_default("delve.toml")?;
//!     let client = Arc::new(OpenAIClient::new(config.api_key()?, &config.provider)?);
//!
//!     let coordinator = ResearchCoordinator::new(client.clone(), client, &config.research);
//!     let report = coordinator.research("How do solid-state batteries work?").await?;
//!
//!     println!("{}", report.markdown_body);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`research`] - The pipeline stages and their coordinator
//! - [`llm`] - Generation service traits and the OpenAI client
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line interface
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Generation service clients and abstractions.
pub mod llm;
/// Research pipeline.
pub mod research;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::openai::OpenAIClient;
pub use llm::{StructuredGenerator, WebSearchGenerator};
pub use research::{ResearchCoordinator, ResearchObserver, ResearchRun};
pub use types::{AppError, Report, Result};
pub use utils::toml_config::DelveConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<DelveConfig>,
    /// Pipeline shared by every request
    pub coordinator: Arc<ResearchCoordinator>,
}
