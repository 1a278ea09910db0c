use crate::llm::{SchemaDescriptor, StructuredGenerator, generate_typed};
use crate::research::context::RunContext;
use crate::types::{AggregatedSource, Report, ReportSource, Result, TruncatedResult};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{info, instrument};

pub const WRITER_INSTRUCTIONS: &str = "You are a professional research writer tasked with creating comprehensive, well-structured reports.
You will receive a research question and summaries from multiple web searches on the topic.

Your task:
1. Analyze all the research summaries
2. Create a structured, professional report in markdown format
3. Include an executive summary, main findings, analysis, and conclusions
4. Ensure the report is thorough (aim for 800-1500 words)
5. Cite key information and maintain objectivity
6. Structure the report logically with clear headings and sections

The report should be informative, well-organized, and provide valuable insights on the research topic.";

/// Writes the final [`Report`] from truncated findings and aggregated sources
pub struct Synthesizer {
    generator: Arc<dyn StructuredGenerator>,
    schema: SchemaDescriptor,
    placeholder_description: String,
}

impl Synthesizer {
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        placeholder_description: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            schema: SchemaDescriptor::of::<Report>("report_data"),
            placeholder_description: placeholder_description.into(),
        }
    }

    /// Generate the report; service and schema failures propagate.
    ///
    /// An empty `sources` list in the generated report is replaced with the
    /// aggregated sources.
    #[instrument(skip_all, fields(run_id = %ctx.run_id(), results = results.len(), sources = sources.len()))]
    pub async fn synthesize(
        &self,
        ctx: &RunContext,
        question: &str,
        results: &[TruncatedResult],
        sources: &[AggregatedSource],
    ) -> Result<Report> {
        let prompt = build_report_prompt(question, results, sources);

        let mut report: Report = generate_typed(
            self.generator.as_ref(),
            WRITER_INSTRUCTIONS,
            &prompt,
            &self.schema,
        )
        .await?;

        if backfill_sources(&mut report, sources, &self.placeholder_description) {
            info!(sources = report.sources.len(), "Backfilled report sources");
        }

        Ok(report)
    }
}

/// Replace an empty `report.sources` with one entry per aggregated source.
///
/// Returns whether anything was filled in.
pub fn backfill_sources(
    report: &mut Report,
    sources: &[AggregatedSource],
    placeholder_description: &str,
) -> bool {
    if !report.sources.is_empty() || sources.is_empty() {
        return false;
    }

    report.sources = sources
        .iter()
        .map(|source| ReportSource {
            url: source.url.clone(),
            title: source.title.clone(),
            description: Some(placeholder_description.to_string()),
        })
        .collect();
    true
}

/// Synthesis prompt: question, citation rules, numbered sources, then every
/// truncated result with its citations.
pub fn build_report_prompt(
    question: &str,
    results: &[TruncatedResult],
    sources: &[AggregatedSource],
) -> String {
    let mut prompt = format!(
        "Research Question: {}

Important Instructions:
- Create a comprehensive report with proper citations using [Source Title](URL) format
- Reference specific sources when making claims
- Include a Sources section at the end

Available Sources:
",
        question
    );

    for (index, source) in sources.iter().enumerate() {
        let _ = writeln!(prompt, "{}. [{}]({})", index + 1, source.title, source.url);
    }

    prompt.push_str("\nResearch Findings (truncated for efficiency):\n");

    for (index, result) in results.iter().enumerate() {
        let citations = result
            .citations
            .iter()
            .map(|c| format!("[{}]({})", c.title, c.url))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            prompt,
            "\n--- Result {} ---\n{}\nCitations: {}\n",
            index + 1,
            result.body,
            citations
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppError, Citation};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct FixedGenerator(Option<Value>);

    #[async_trait]
    impl StructuredGenerator for FixedGenerator {
        async fn generate(
            &self,
            _instructions: &str,
            _prompt: &str,
            schema: &SchemaDescriptor,
        ) -> Result<Value> {
            assert_eq!(schema.name, "report_data");
            self.0
                .clone()
                .ok_or_else(|| AppError::LLM("Mock LLM failure".to_string()))
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn sources() -> Vec<AggregatedSource> {
        vec![
            AggregatedSource {
                url: "https://a.example".to_string(),
                title: "A".to_string(),
            },
            AggregatedSource {
                url: "https://b.example".to_string(),
                title: "B".to_string(),
            },
        ]
    }

    fn report_json(sources: Value) -> Value {
        json!({
            "executiveSummary": "Summary",
            "markdownBody": "# Report",
            "keyFindings": ["one"],
            "followUpQuestions": ["why?"],
            "sources": sources
        })
    }

    #[test]
    fn test_prompt_lists_sources_and_results() {
        let results = vec![TruncatedResult {
            body: "Body text".to_string(),
            citations: vec![Citation {
                url: "https://a.example".to_string(),
                title: "A".to_string(),
                start_offset: 0,
                end_offset: 4,
            }],
        }];

        let prompt = build_report_prompt("Why?", &results, &sources());

        assert!(prompt.starts_with("Research Question: Why?\n"));
        assert!(prompt.contains("1. [A](https://a.example)\n2. [B](https://b.example)\n"));
        assert!(prompt.contains("--- Result 1 ---\nBody text\nCitations: [A](https://a.example)\n"));
    }

    #[test]
    fn test_backfill_only_when_empty() {
        let mut report = Report::default();
        assert!(backfill_sources(&mut report, &sources(), "Research source"));
        assert_eq!(report.sources.len(), 2);
        assert_eq!(
            report.sources[0].description.as_deref(),
            Some("Research source")
        );

        let mut already = Report {
            sources: vec![ReportSource {
                url: "https://z.example".to_string(),
                title: "Z".to_string(),
                description: None,
            }],
            ..Default::default()
        };
        assert!(!backfill_sources(&mut already, &sources(), "Research source"));
        assert_eq!(already.sources.len(), 1);
    }

    #[test]
    fn test_backfill_without_sources_is_noop() {
        let mut report = Report::default();
        assert!(!backfill_sources(&mut report, &[], "Research source"));
        assert!(report.sources.is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_backfills_empty_sources() {
        let synthesizer = Synthesizer::new(
            std::sync::Arc::new(FixedGenerator(Some(report_json(json!([]))))),
            "Research source",
        );

        let report = synthesizer
            .synthesize(&RunContext::new(), "q", &[], &sources())
            .await
            .unwrap();

        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.markdown_body, "# Report");
    }

    #[tokio::test]
    async fn test_synthesize_keeps_generated_sources() {
        let synthesizer = Synthesizer::new(
            std::sync::Arc::new(FixedGenerator(Some(report_json(json!([
                {"url": "https://a.example", "title": "A", "description": "Primary data"}
            ]))))),
            "Research source",
        );

        let report = synthesizer
            .synthesize(&RunContext::new(), "q", &[], &sources())
            .await
            .unwrap();

        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.sources[0].description.as_deref(), Some("Primary data"));
    }

    #[tokio::test]
    async fn test_synthesize_failure_propagates() {
        let synthesizer = Synthesizer::new(std::sync::Arc::new(FixedGenerator(None)), "x");
        let result = synthesizer
            .synthesize(&RunContext::new(), "q", &[], &sources())
            .await;
        assert!(matches!(result, Err(AppError::LLM(_))));
    }
}
