//! Mock implementations for testing.
//!
//! Hand-written stand-ins for the two generation services so the pipeline can
//! be exercised end to end without network access.

use async_trait::async_trait;
use delve::llm::{SchemaDescriptor, StructuredGenerator, WebSearchGenerator, WebSearchResponse};
use delve::types::{AppError, Citation, Result};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Structured generator that answers by schema name.
///
/// `web_search_plan` gets the configured plan, `report_data` the configured
/// report. Either can be switched to fail.
pub struct MockGenerator {
    plan: Value,
    report: Value,
    fail_planning: bool,
    fail_synthesis: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(plan: Value, report: Value) -> Self {
        Self {
            plan,
            report,
            fail_planning: false,
            fail_synthesis: false,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Plan made of the given queries, each with a short reason
    pub fn with_queries(queries: &[&str], report: Value) -> Self {
        Self::new(plan_for(queries), report)
    }

    pub fn failing_planning(mut self) -> Self {
        self.fail_planning = true;
        self
    }

    pub fn failing_synthesis(mut self) -> Self {
        self.fail_synthesis = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    async fn generate(
        &self,
        _instructions: &str,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match schema.name.as_str() {
            "web_search_plan" if self.fail_planning => {
                Err(AppError::LLM("Mock planning failure".to_string()))
            }
            "web_search_plan" => Ok(self.plan.clone()),
            "report_data" if self.fail_synthesis => {
                Err(AppError::LLM("Mock synthesis failure".to_string()))
            }
            "report_data" => Ok(self.report.clone()),
            other => Err(AppError::Schema(format!("Unexpected schema {}", other))),
        }
    }

    fn model_name(&self) -> &str {
        "mock-generator"
    }
}

/// Web search service keyed by query.
///
/// Queries listed as failing return an error; every other query returns its
/// configured citations (none by default) and a body naming the query.
#[derive(Default)]
pub struct MockWebSearch {
    failing: HashSet<String>,
    citations: HashMap<String, Vec<(String, String)>>,
    calls: AtomicUsize,
}

impl MockWebSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Attach `(url, title)` citations to a query
    pub fn cite(mut self, query: &str, sources: &[(&str, &str)]) -> Self {
        self.citations.insert(
            query.to_string(),
            sources
                .iter()
                .map(|(url, title)| (url.to_string(), title.to_string()))
                .collect(),
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// The query a search prompt was built from
pub fn query_of(prompt: &str) -> &str {
    prompt
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("Search for: ")
}

#[async_trait]
impl WebSearchGenerator for MockWebSearch {
    async fn search_generate(&self, prompt: &str) -> Result<WebSearchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = query_of(prompt);

        if self.failing.contains(query) {
            return Err(AppError::LLM(format!("Mock search failure for {}", query)));
        }

        let text = format!("Findings about {}", query);
        let citations = self
            .citations
            .get(query)
            .map(|sources| {
                sources
                    .iter()
                    .map(|(url, title)| Citation {
                        url: url.clone(),
                        title: title.clone(),
                        start_offset: 0,
                        end_offset: text.chars().count(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(WebSearchResponse { text, citations })
    }

    fn model_name(&self) -> &str {
        "mock-search"
    }
}

pub fn plan_for(queries: &[&str]) -> Value {
    let searches: Vec<Value> = queries
        .iter()
        .map(|q| json!({"query": q, "reason": format!("Covers {}", q)}))
        .collect();
    json!({ "searches": searches })
}

/// A schema-valid report; `sources` is left as given
pub fn report_with_sources(sources: Value) -> Value {
    json!({
        "executiveSummary": "Renewable capacity keeps growing.",
        "markdownBody": "## Overview\n\nSolar and wind lead new installations.",
        "keyFindings": ["Solar leads", "Storage is scaling"],
        "followUpQuestions": ["How fast is storage cost falling?"],
        "sources": sources
    })
}
