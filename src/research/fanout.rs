use crate::research::context::{ResearchObserver, RunContext};
use crate::research::searcher::Searcher;
use crate::types::{SearchPlan, TaggedResult};
use tokio::task::JoinSet;
use tracing::{Instrument, info, instrument, warn};

/// Launches every task of a plan concurrently and waits for all of them.
///
/// There is no concurrency bound, no timeout and no cancellation: a slow
/// search holds the barrier until the service client gives up on it.
pub struct FanOutExecutor {
    searcher: Searcher,
}

impl FanOutExecutor {
    pub fn new(searcher: Searcher) -> Self {
        Self { searcher }
    }

    /// Run all searches and return them in completion order.
    ///
    /// Each result is tagged with the index of its task in `plan`; callers
    /// must use that tag, not the position in the returned vector.
    #[instrument(skip_all, fields(run_id = %ctx.run_id(), searches = plan.len()))]
    pub async fn execute_all(
        &self,
        ctx: &RunContext,
        plan: SearchPlan,
        observer: &dyn ResearchObserver,
    ) -> Vec<TaggedResult> {
        let total = plan.len();
        let mut set = JoinSet::new();

        for (task_index, task) in plan.searches.into_iter().enumerate() {
            let searcher = self.searcher.clone();
            set.spawn(
                async move {
                    let result = searcher.search(&task).await;
                    TaggedResult {
                        task_index,
                        task,
                        result,
                    }
                }
                .instrument(ctx.span().clone()),
            );
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(tagged) => {
                    observer.search_finished(&tagged.status(), total);
                    results.push(tagged);
                }
                Err(e) => {
                    warn!(error = %e, "Search task did not complete");
                }
            }
        }

        let succeeded = results.iter().filter(|r| !r.result.is_empty()).count();
        info!(
            completed = results.len(),
            succeeded,
            total,
            "All searches finished"
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{WebSearchGenerator, WebSearchResponse};
    use crate::research::context::NoopObserver;
    use crate::types::{AppError, Result, SearchStatus, SearchTask};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Finishes later queries first and fails any query containing "fail"
    struct ReverseDelaySearch;

    #[async_trait]
    impl WebSearchGenerator for ReverseDelaySearch {
        async fn search_generate(&self, prompt: &str) -> Result<WebSearchResponse> {
            let query = prompt
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("Search for: ")
                .to_string();
            let n: u64 = query
                .trim_start_matches(|c: char| !c.is_ascii_digit())
                .parse()
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50 - n * 10)).await;

            if query.contains("fail") {
                return Err(AppError::LLM("simulated".to_string()));
            }
            Ok(WebSearchResponse {
                text: format!("body {}", query),
                citations: vec![],
            })
        }

        fn model_name(&self) -> &str {
            "reverse"
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        statuses: Mutex<Vec<SearchStatus>>,
    }

    impl ResearchObserver for RecordingObserver {
        fn search_finished(&self, status: &SearchStatus, total: usize) {
            assert_eq!(total, 4);
            self.statuses.lock().unwrap().push(status.clone());
        }
    }

    fn plan(queries: &[&str]) -> SearchPlan {
        SearchPlan {
            searches: queries
                .iter()
                .map(|q| SearchTask {
                    query: q.to_string(),
                    reason: String::new(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_results_tagged_with_task_index() {
        let executor = FanOutExecutor::new(Searcher::new(Arc::new(ReverseDelaySearch)));
        let results = executor
            .execute_all(
                &RunContext::new(),
                plan(&["q0", "q1", "q2", "q3"]),
                &NoopObserver,
            )
            .await;

        assert_eq!(results.len(), 4);
        for tagged in &results {
            assert_eq!(tagged.task.query, format!("q{}", tagged.task_index));
            assert_eq!(tagged.result.body, format!("body q{}", tagged.task_index));
        }
    }

    #[tokio::test]
    async fn test_failures_still_complete() {
        let observer = RecordingObserver::default();
        let executor = FanOutExecutor::new(Searcher::new(Arc::new(ReverseDelaySearch)));
        let results = executor
            .execute_all(
                &RunContext::new(),
                plan(&["ok0", "fail1", "ok2", "fail3"]),
                &observer,
            )
            .await;

        assert_eq!(results.len(), 4);
        let empty = results.iter().filter(|r| r.result.is_empty()).count();
        assert_eq!(empty, 2);

        let statuses = observer.statuses.lock().unwrap();
        assert_eq!(statuses.len(), 4);
        let failed: Vec<usize> = {
            let mut f: Vec<usize> = statuses
                .iter()
                .filter(|s| !s.succeeded)
                .map(|s| s.task_index)
                .collect();
            f.sort();
            f
        };
        assert_eq!(failed, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let executor = FanOutExecutor::new(Searcher::new(Arc::new(ReverseDelaySearch)));
        let results = executor
            .execute_all(&RunContext::new(), SearchPlan::default(), &NoopObserver)
            .await;
        assert!(results.is_empty());
    }
}
