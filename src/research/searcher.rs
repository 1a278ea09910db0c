use crate::llm::WebSearchGenerator;
use crate::types::{SearchResult, SearchTask};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs one [`SearchTask`] against the web-search service.
///
/// Total: every failure degrades to [`SearchResult::empty`].
#[derive(Clone)]
pub struct Searcher {
    client: Arc<dyn WebSearchGenerator>,
}

impl Searcher {
    pub fn new(client: Arc<dyn WebSearchGenerator>) -> Self {
        Self { client }
    }

    pub async fn search(&self, task: &SearchTask) -> SearchResult {
        let prompt = build_search_prompt(task);

        match self.client.search_generate(&prompt).await {
            Ok(response) => {
                debug!(
                    query = %task.query,
                    chars = response.text.chars().count(),
                    citations = response.citations.len(),
                    "Web search completed"
                );
                SearchResult {
                    body: response.text,
                    citations: response.citations,
                }
            }
            Err(e) => {
                warn!(query = %task.query, error = %e, "Web search failed");
                SearchResult::empty()
            }
        }
    }
}

/// Prompt sent to the web-search service for one task
pub fn build_search_prompt(task: &SearchTask) -> String {
    let reason = task.reason.trim();
    if reason.is_empty() {
        format!(
            "Search for: {}\n\nProvide a comprehensive summary of current information on this topic.",
            task.query
        )
    } else {
        format!(
            "Search for: {}\nContext: {}\n\nProvide a comprehensive summary of current information on this topic.",
            task.query, reason
        )
    }
}
