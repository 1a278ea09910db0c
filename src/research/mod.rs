//! Research Pipeline
//!
//! Turns a research question into a structured, cited [`Report`](crate::types::Report).
//!
//! # Architecture
//!
//! Stages run strictly forward, each handing its output to the next by value:
//! - [`planner::Planner`] - Decomposes the question into a [`SearchPlan`](crate::types::SearchPlan)
//! - [`fanout::FanOutExecutor`] - Runs every search concurrently through a [`searcher::Searcher`]
//! - [`aggregator::CitationAggregator`] - Deduplicates citations and bounds body sizes
//! - [`synthesizer::Synthesizer`] - Writes the report and backfills its sources
//! - [`coordinator::ResearchCoordinator`] - Sequences the stages under one [`context::RunContext`]
//!
//! # Usage
//!
//! ```ignore
//! use delve::research::coordinator::ResearchCoordinator;
//!
//! let coordinator = ResearchCoordinator::new(generator, web_search, &config.research);
//!
//! let report = coordinator
//!     .research("What are current trends in renewable energy?")
//!     .await?;
//!
//! println!("{}", report.executive_summary);
//! for source in report.sources {
//!     println!("- {}", source.url);
//! }
//! ```
//!
//! # Failure Model
//!
//! Planning and synthesis failures abort the run. Search failures never do:
//! a failed search is an empty result and simply contributes no sources.

/// Citation deduplication and body truncation.
pub mod aggregator;
/// Run context, stage machine and progress observer.
pub mod context;
/// Stage sequencing.
pub mod coordinator;
/// Concurrent search execution.
pub mod fanout;
/// Question decomposition.
pub mod planner;
/// Single web search.
pub mod searcher;
/// Report generation.
pub mod synthesizer;

pub use context::{NoopObserver, ResearchObserver, ResearchStage, RunContext};
pub use coordinator::{ResearchCoordinator, ResearchRun, StageTimings};
