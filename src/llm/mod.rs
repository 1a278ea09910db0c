//! Generation Service Clients and Abstractions
//!
//! The research pipeline talks to two external capabilities through traits:
//! - [`StructuredGenerator`] - schema-constrained generation (planner, synthesizer)
//! - [`WebSearchGenerator`] - web-grounded generation with URL citations (searcher)
//!
//! [`openai::OpenAIClient`] implements both against an OpenAI-compatible API.
//!
//! # Example
//!
//! ```ignore
//! use delve::llm::{generate_typed, openai::OpenAIClient, SchemaDescriptor};
//!
//! let client = OpenAIClient::new(api_key, &config.provider)?;
//! let schema = SchemaDescriptor::of::<SearchPlan>("web_search_plan");
//! let plan: SearchPlan = generate_typed(&client, instructions, prompt, &schema).await?;
//! ```

/// Core generation traits and typed decoding.
pub mod client;
/// OpenAI-compatible HTTP client.
pub mod openai;

pub use client::{
    SchemaDescriptor, StructuredGenerator, WebSearchGenerator, WebSearchResponse, generate_typed,
};
