//! Generation service abstractions
//!
//! The research pipeline consumes two capabilities:
//! - **Structured generation**: instructions + prompt + JSON schema in,
//!   a JSON value conforming to that schema out.
//! - **Web-search generation**: a prompt in, free text plus URL citations
//!   anchored to character ranges of that text out.
//!
//! Both are traits so the pipeline can run against any provider, and against
//! in-memory fakes in tests.

use crate::types::{AppError, Citation, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Name plus JSON schema handed to the structured generation service
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    /// Identifier for the schema (`^[a-zA-Z0-9_-]+$` for OpenAI)
    pub name: String,
    /// The JSON schema document
    pub schema: Value,
}

impl SchemaDescriptor {
    /// Build a descriptor from a type's derived JSON schema
    pub fn of<T: JsonSchema>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: schemars::schema_for!(T).to_value(),
        }
    }
}

/// Structured generation capability
///
/// Implementations return the raw JSON value; use [`generate_typed`] to
/// decode it into a concrete type.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generate a value conforming to `schema`
    async fn generate(
        &self,
        instructions: &str,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Answer of the web-search generation service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebSearchResponse {
    /// The plain-text answer
    pub text: String,
    /// URL citations anchored into `text`
    pub citations: Vec<Citation>,
}

/// Web-search generation capability
#[async_trait]
pub trait WebSearchGenerator: Send + Sync {
    /// Run a web-grounded generation for `prompt`
    async fn search_generate(&self, prompt: &str) -> Result<WebSearchResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Call the structured generation service and decode its value into `T`.
///
/// Values that do not deserialize into `T` are rejected with
/// [`AppError::Schema`]; nothing is coerced.
pub async fn generate_typed<T: DeserializeOwned>(
    generator: &dyn StructuredGenerator,
    instructions: &str,
    prompt: &str,
    schema: &SchemaDescriptor,
) -> Result<T> {
    let value = generator.generate(instructions, prompt, schema).await?;

    serde_json::from_value(value).map_err(|e| {
        AppError::Schema(format!(
            "Response did not match schema '{}': {}",
            schema.name, e
        ))
    })
}
