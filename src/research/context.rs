//! Per-run context, stage machine and progress observation.

use crate::types::{SearchPlan, SearchStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::Span;
use utoipa::ToSchema;
use uuid::Uuid;

/// Observability scope of one research run.
///
/// Created by the coordinator and passed by reference to every stage. The
/// span carries the run id so every log line of the run, including those
/// emitted from spawned search tasks, can be correlated.
#[derive(Debug)]
pub struct RunContext {
    run_id: Uuid,
    started: Instant,
    span: Span,
}

impl RunContext {
    pub fn new() -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            started: Instant::now(),
            span: tracing::info_span!("research", run_id = %run_id),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear state machine of a run.
///
/// `Failed` is only reachable from `Planning` and `Synthesizing`; searching
/// and aggregation cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResearchStage {
    Idle,
    Planning,
    Searching,
    Aggregating,
    Synthesizing,
    Done,
    Failed,
}

impl ResearchStage {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: ResearchStage) -> bool {
        use ResearchStage::*;
        matches!(
            (self, next),
            (Idle, Planning)
                | (Planning, Searching)
                | (Planning, Failed)
                | (Searching, Aggregating)
                | (Aggregating, Synthesizing)
                | (Synthesizing, Done)
                | (Synthesizing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ResearchStage::Done | ResearchStage::Failed)
    }
}

impl fmt::Display for ResearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResearchStage::Idle => "idle",
            ResearchStage::Planning => "planning",
            ResearchStage::Searching => "searching",
            ResearchStage::Aggregating => "aggregating",
            ResearchStage::Synthesizing => "synthesizing",
            ResearchStage::Done => "done",
            ResearchStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Receives progress of a run. Presentation layers (CLI, logs) implement this;
/// every method has a no-op default.
pub trait ResearchObserver: Send + Sync {
    fn stage_changed(&self, _run_id: Uuid, _stage: ResearchStage) {}

    fn plan_ready(&self, _plan: &SearchPlan) {}

    /// Called once per finished search, in completion order
    fn search_finished(&self, _status: &SearchStatus, _total: usize) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl ResearchObserver for NoopObserver {}
