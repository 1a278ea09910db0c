use crate::{
    llm::{StructuredGenerator, WebSearchGenerator},
    research::{
        aggregator::CitationAggregator,
        context::{NoopObserver, ResearchObserver, ResearchStage, RunContext},
        fanout::FanOutExecutor,
        planner::Planner,
        searcher::Searcher,
        synthesizer::Synthesizer,
    },
    types::{AppError, Report, Result, SearchStatus},
    utils::toml_config::ResearchConfig,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

/// Wall-clock time spent in each stage, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTimings {
    pub planning_ms: u64,
    pub searching_ms: u64,
    pub aggregating_ms: u64,
    pub synthesizing_ms: u64,
    pub total_ms: u64,
}

/// Everything a finished run hands back to its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRun {
    pub run_id: Uuid,
    pub question: String,
    pub report: Report,
    /// One entry per completed search, ordered by task index
    pub searches: Vec<SearchStatus>,
    pub timings: StageTimings,
    pub completed_at: DateTime<Utc>,
}

impl ResearchRun {
    pub fn succeeded_searches(&self) -> usize {
        self.searches.iter().filter(|s| s.succeeded).count()
    }
}

/// Sequences planning, fan-out search, aggregation and synthesis.
pub struct ResearchCoordinator {
    planner: Planner,
    executor: FanOutExecutor,
    aggregator: CitationAggregator,
    synthesizer: Synthesizer,
}

impl ResearchCoordinator {
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        web_search: Arc<dyn WebSearchGenerator>,
        config: &ResearchConfig,
    ) -> Self {
        Self {
            planner: Planner::new(generator.clone()),
            executor: FanOutExecutor::new(Searcher::new(web_search)),
            aggregator: CitationAggregator::from_config(config),
            synthesizer: Synthesizer::new(generator, config.placeholder_description.clone()),
        }
    }

    /// Execute a research run and return only the report
    pub async fn research(&self, question: &str) -> Result<Report> {
        Ok(self.run(question, &NoopObserver).await?.report)
    }

    /// Execute a research run, reporting progress to `observer`.
    ///
    /// Fails only when planning or synthesis fails; individual search
    /// failures show up as unsuccessful entries in [`ResearchRun::searches`].
    pub async fn run(&self, question: &str, observer: &dyn ResearchObserver) -> Result<ResearchRun> {
        let ctx = RunContext::new();
        let span = ctx.span().clone();
        self.run_stages(&ctx, question, observer)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        ctx: &RunContext,
        question: &str,
        observer: &dyn ResearchObserver,
    ) -> Result<ResearchRun> {
        let mut timings = StageTimings::default();
        let mut stages = StageTracker::start(ctx, observer);
        info!(%question, "Starting research");

        // Planning
        stages.advance(ResearchStage::Planning);
        let started = Instant::now();
        let plan = match self.planner.plan(ctx, question).await {
            Ok(plan) => plan,
            Err(e) => return Err(stages.fail(e)),
        };
        timings.planning_ms = elapsed_ms(started);
        observer.plan_ready(&plan);

        // Searching
        stages.advance(ResearchStage::Searching);
        let started = Instant::now();
        let planned = plan.len();
        let results = self.executor.execute_all(ctx, plan, observer).await;
        timings.searching_ms = elapsed_ms(started);

        let mut searches: Vec<SearchStatus> = results.iter().map(|r| r.status()).collect();
        searches.sort_by_key(|s| s.task_index);

        // Aggregating
        stages.advance(ResearchStage::Aggregating);
        let started = Instant::now();
        let aggregation = self.aggregator.aggregate(results.iter().map(|r| &r.result));
        timings.aggregating_ms = elapsed_ms(started);
        info!(
            planned,
            completed = results.len(),
            sources = aggregation.sources.len(),
            "Aggregated citations"
        );

        // Synthesizing
        stages.advance(ResearchStage::Synthesizing);
        let started = Instant::now();
        let report = match self
            .synthesizer
            .synthesize(ctx, question, &aggregation.truncated, &aggregation.sources)
            .await
        {
            Ok(report) => report,
            Err(e) => return Err(stages.fail(e)),
        };
        timings.synthesizing_ms = elapsed_ms(started);
        timings.total_ms = ctx.elapsed().as_millis() as u64;

        stages.advance(ResearchStage::Done);
        info!(
            total_ms = timings.total_ms,
            sources = report.sources.len(),
            "Research complete"
        );

        Ok(ResearchRun {
            run_id: ctx.run_id(),
            question: question.to_string(),
            report,
            searches,
            timings,
            completed_at: Utc::now(),
        })
    }
}

/// Current stage of a run; every transition is checked and forwarded to the observer
struct StageTracker<'a> {
    ctx: &'a RunContext,
    observer: &'a dyn ResearchObserver,
    current: ResearchStage,
}

impl<'a> StageTracker<'a> {
    fn start(ctx: &'a RunContext, observer: &'a dyn ResearchObserver) -> Self {
        observer.stage_changed(ctx.run_id(), ResearchStage::Idle);
        Self {
            ctx,
            observer,
            current: ResearchStage::Idle,
        }
    }

    fn advance(&mut self, next: ResearchStage) {
        debug_assert!(
            self.current.can_transition_to(next),
            "illegal stage transition {} -> {}",
            self.current,
            next
        );
        debug!(from = %self.current, to = %next, "Stage transition");
        self.current = next;
        self.observer.stage_changed(self.ctx.run_id(), next);
    }

    /// Move to `Failed`, wrapping `err` with the stage it happened in
    fn fail(&mut self, err: AppError) -> AppError {
        let stage = self.current;
        error!(%stage, error = %err, "Research run failed");
        self.advance(ResearchStage::Failed);
        debug_assert!(self.current.is_terminal());

        match stage {
            ResearchStage::Planning => AppError::Planning(Box::new(err)),
            ResearchStage::Synthesizing => AppError::Synthesis(Box::new(err)),
            _ => err,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{SchemaDescriptor, WebSearchResponse};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedGenerator {
        plan: Option<Value>,
        report: Option<Value>,
    }

    #[async_trait]
    impl StructuredGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _instructions: &str,
            _prompt: &str,
            schema: &SchemaDescriptor,
        ) -> Result<Value> {
            let response = match schema.name.as_str() {
                "web_search_plan" => self.plan.clone(),
                _ => self.report.clone(),
            };
            response.ok_or_else(|| AppError::LLM(format!("{} unavailable", schema.name)))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct CountingSearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WebSearchGenerator for CountingSearch {
        async fn search_generate(&self, _prompt: &str) -> Result<WebSearchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WebSearchResponse {
                text: "finding".to_string(),
                citations: vec![],
            })
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[derive(Default)]
    struct StageRecorder {
        stages: Mutex<Vec<ResearchStage>>,
    }

    impl ResearchObserver for StageRecorder {
        fn stage_changed(&self, _run_id: Uuid, stage: ResearchStage) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    fn plan_json() -> Value {
        json!({"searches": [
            {"query": "a", "reason": "x"},
            {"query": "b", "reason": "y"}
        ]})
    }

    fn report_json() -> Value {
        json!({
            "executiveSummary": "s",
            "markdownBody": "body",
            "keyFindings": [],
            "followUpQuestions": [],
            "sources": []
        })
    }

    fn assert_stages_legal(stages: &[ResearchStage]) {
        assert_eq!(stages.first(), Some(&ResearchStage::Idle));
        for pair in stages.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {}",
                pair[0],
                pair[1]
            );
        }
        assert!(stages.last().is_some_and(|s| s.is_terminal()));
    }

    #[tokio::test]
    async fn test_stage_sequence_on_success() {
        let recorder = StageRecorder::default();
        let coordinator = ResearchCoordinator::new(
            Arc::new(ScriptedGenerator {
                plan: Some(plan_json()),
                report: Some(report_json()),
            }),
            Arc::new(CountingSearch::default()),
            &ResearchConfig::default(),
        );

        let run = coordinator.run("q", &recorder).await.unwrap();

        assert_eq!(
            *recorder.stages.lock().unwrap(),
            vec![
                ResearchStage::Idle,
                ResearchStage::Planning,
                ResearchStage::Searching,
                ResearchStage::Aggregating,
                ResearchStage::Synthesizing,
                ResearchStage::Done,
            ]
        );
        assert_stages_legal(&recorder.stages.lock().unwrap());
        assert_eq!(run.searches.len(), 2);
        assert_eq!(run.searches[0].task_index, 0);
        assert_eq!(run.searches[1].task_index, 1);
        assert_eq!(run.succeeded_searches(), 2);
    }

    #[tokio::test]
    async fn test_planning_failure_launches_no_searches() {
        let search = Arc::new(CountingSearch::default());
        let recorder = StageRecorder::default();
        let coordinator = ResearchCoordinator::new(
            Arc::new(ScriptedGenerator {
                plan: None,
                report: Some(report_json()),
            }),
            search.clone(),
            &ResearchConfig::default(),
        );

        let result = coordinator.run("q", &recorder).await;

        assert!(matches!(result, Err(AppError::Planning(_))));
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            recorder.stages.lock().unwrap().last(),
            Some(&ResearchStage::Failed)
        );
        assert_stages_legal(&recorder.stages.lock().unwrap());
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_fatal() {
        let coordinator = ResearchCoordinator::new(
            Arc::new(ScriptedGenerator {
                plan: Some(plan_json()),
                report: None,
            }),
            Arc::new(CountingSearch::default()),
            &ResearchConfig::default(),
        );

        let recorder = StageRecorder::default();
        let result = coordinator.run("q", &recorder).await;
        assert_stages_legal(&recorder.stages.lock().unwrap());
        match result {
            Err(AppError::Synthesis(inner)) => assert!(inner.to_string().contains("report_data")),
            other => panic!("Expected synthesis failure, got {:?}", other),
        }
    }
}
