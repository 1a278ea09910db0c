use super::output::Output;
use crate::research::{ResearchObserver, ResearchStage};
use crate::types::{SearchPlan, SearchStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Prints stage transitions and per-search outcomes as a run progresses
pub struct CliProgress<'a> {
    output: &'a Output,
    finished: AtomicUsize,
}

impl<'a> CliProgress<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self {
            output,
            finished: AtomicUsize::new(0),
        }
    }
}

impl ResearchObserver for CliProgress<'_> {
    fn stage_changed(&self, _run_id: Uuid, stage: ResearchStage) {
        match stage {
            ResearchStage::Planning => self.output.step(1, 4, "Planning searches..."),
            ResearchStage::Searching => {
                self.finished.store(0, Ordering::SeqCst);
                self.output.step(2, 4, "Searching the web...");
            }
            ResearchStage::Aggregating => self.output.step(3, 4, "Collecting citations..."),
            ResearchStage::Synthesizing => self.output.step(4, 4, "Writing report..."),
            ResearchStage::Idle | ResearchStage::Done | ResearchStage::Failed => {}
        }
    }

    fn plan_ready(&self, plan: &SearchPlan) {
        self.output
            .info(&format!("Generated {} search queries", plan.len()));
    }

    fn search_finished(&self, status: &SearchStatus, total: usize) {
        let done = self.finished.fetch_add(1, Ordering::SeqCst) + 1;
        self.output.search_status(status, done, total);
    }
}
