use crate::types::{AggregatedSource, SearchResult, TruncatedResult};
use crate::utils::toml_config::ResearchConfig;
use std::collections::HashSet;

/// Output of [`CitationAggregator::aggregate`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    /// Unique by URL, in first-seen order
    pub sources: Vec<AggregatedSource>,
    /// One entry per input result, bodies capped
    pub truncated: Vec<TruncatedResult>,
}

/// Folds citations from completed searches into a deduplicated source list
/// and bounds each body before it reaches the synthesis prompt.
///
/// Pure: aggregating the same input twice yields the same output.
#[derive(Debug, Clone)]
pub struct CitationAggregator {
    body_char_limit: usize,
    ellipsis: String,
}

impl CitationAggregator {
    pub fn new(body_char_limit: usize, ellipsis: impl Into<String>) -> Self {
        Self {
            body_char_limit,
            ellipsis: ellipsis.into(),
        }
    }

    pub fn from_config(config: &ResearchConfig) -> Self {
        Self::new(config.body_char_limit, config.ellipsis.clone())
    }

    pub fn aggregate<'a, I>(&self, results: I) -> Aggregation
    where
        I: IntoIterator<Item = &'a SearchResult>,
    {
        let mut seen = HashSet::new();
        let mut aggregation = Aggregation::default();

        for result in results {
            for citation in &result.citations {
                // first-seen title wins
                if seen.insert(citation.url.as_str()) {
                    aggregation.sources.push(AggregatedSource {
                        url: citation.url.clone(),
                        title: citation.title.clone(),
                    });
                }
            }

            aggregation.truncated.push(TruncatedResult {
                body: truncate_body(&result.body, self.body_char_limit, &self.ellipsis),
                citations: result.citations.clone(),
            });
        }

        aggregation
    }
}

impl Default for CitationAggregator {
    fn default() -> Self {
        Self::from_config(&ResearchConfig::default())
    }
}

/// Keep the first `limit` characters of `body`, appending `marker` if anything
/// was cut. Counts Unicode scalar values, so multi-byte text is never split.
pub fn truncate_body(body: &str, limit: usize, marker: &str) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &body[..cut], marker),
        None => body.to_string(),
    }
}
