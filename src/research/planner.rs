use crate::llm::{SchemaDescriptor, StructuredGenerator, generate_typed};
use crate::research::context::RunContext;
use crate::types::{Result, SearchPlan};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const PLANNER_INSTRUCTIONS: &str = "You are a research planning assistant.
Given a research question, create a search strategy by generating 8-12 specific search queries.
Each query should target different aspects of the topic to ensure thorough coverage.
For each query, give a one-sentence reason explaining why it matters for the question.
Focus on current, factual information and diverse perspectives.";

/// Soft target for plan size; plans outside it are logged, not rejected
pub const TARGET_PLAN_SIZE: RangeInclusive<usize> = 8..=12;

/// Turns a research question into an ordered [`SearchPlan`]
pub struct Planner {
    generator: Arc<dyn StructuredGenerator>,
    schema: SchemaDescriptor,
}

impl Planner {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self {
            generator,
            schema: SchemaDescriptor::of::<SearchPlan>("web_search_plan"),
        }
    }

    /// Plan the searches for `question`.
    ///
    /// Service and schema failures propagate; no partial plan is returned.
    #[instrument(skip_all, fields(run_id = %ctx.run_id()))]
    pub async fn plan(&self, ctx: &RunContext, question: &str) -> Result<SearchPlan> {
        let prompt = format!("Research Question: {}", question);

        let plan: SearchPlan = generate_typed(
            self.generator.as_ref(),
            PLANNER_INSTRUCTIONS,
            &prompt,
            &self.schema,
        )
        .await?;

        if !TARGET_PLAN_SIZE.contains(&plan.len()) {
            warn!(
                searches = plan.len(),
                "Search plan size outside the {}-{} target",
                TARGET_PLAN_SIZE.start(),
                TARGET_PLAN_SIZE.end()
            );
        }

        info!(searches = plan.len(), "Generated search plan");
        Ok(plan)
    }
}
