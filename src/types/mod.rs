use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============= API Request/Response Types =============

/// Body of `POST /research`.
///
/// `query` is optional at the type level so that a missing field is reported
/// as a 400 by the handler instead of a deserialization rejection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResponse {
    pub success: bool,
    pub report: Report,
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
    pub duration_ms: u64,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Model used for planning and synthesis
    pub model: String,
}

// ============= Planning Types =============

/// A single web search the planner wants executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchTask {
    /// The specific search term or phrase to use for web search
    pub query: String,
    /// Explanation of why this search query is important for answering the research question
    pub reason: String,
}

/// Ordered list of searches produced by the planner
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchPlan {
    /// List of strategic web searches to comprehensively research the topic
    pub searches: Vec<SearchTask>,
}

impl SearchPlan {
    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

// ============= Search Types =============

/// A source attribution anchored to a character range of a search body.
///
/// Offsets are only meaningful against the [`SearchResult`] that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub url: String,
    pub title: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Normalized answer of one web search.
///
/// An empty body with no citations is how a failed search is represented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub body: String,
    pub citations: Vec<Citation>,
}

impl SearchResult {
    /// The failure sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.citations.is_empty()
    }
}

/// A search result together with the plan entry that produced it.
///
/// Fan-out completes in arbitrary order, so the index is the only reliable
/// link back to the originating task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResult {
    pub task_index: usize,
    pub task: SearchTask,
    pub result: SearchResult,
}

impl TaggedResult {
    pub fn status(&self) -> SearchStatus {
        SearchStatus {
            task_index: self.task_index,
            query: self.task.query.clone(),
            succeeded: !self.result.is_empty(),
            citation_count: self.result.citations.len(),
        }
    }
}

/// Per-query outcome, used for progress reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchStatus {
    pub task_index: usize,
    pub query: String,
    pub succeeded: bool,
    pub citation_count: usize,
}

// ============= Aggregation Types =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSource {
    pub url: String,
    pub title: String,
}

/// A search body cut down to the prompt budget; citations are carried unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncatedResult {
    pub body: String,
    pub citations: Vec<Citation>,
}

// ============= Report Types =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ReportSource {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The final structured research report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// A concise 2-3 sentence overview of the main findings
    pub executive_summary: String,
    /// The complete research report in markdown format with proper citations
    pub markdown_body: String,
    /// List of 3-5 most important discoveries or insights
    pub key_findings: Vec<String>,
    /// Suggested questions for further research or investigation
    pub follow_up_questions: Vec<String>,
    /// List of all sources used in the research with proper attribution
    #[serde(default)]
    pub sources: Vec<ReportSource>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Schema validation error: {0}")]
    Schema(String),

    #[error("Planning failed: {0}")]
    Planning(#[source] Box<AppError>),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] Box<AppError>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::InvalidInput(msg) => (
                axum::http::StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg,
                    details: None,
                },
            ),
            AppError::Config(msg) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "API key not configured".to_string(),
                    details: Some(msg),
                },
            ),
            other => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "An error occurred during research".to_string(),
                    details: Some(other.to_string()),
                },
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
