// Loop state and the read-only snapshot handed to presentation
//
// LoopState lives behind the orchestrator's mutex. Presentation never sees it
// directly; it asks for a LoopSnapshot, a cloned copy taken under the lock.

use super::buffer::RollingBuffer;
use crate::model::{ContentAsset, Learning, LogEntry, LogSeverity, TrendSource};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MAX_LOGS: usize = 8;
pub const MAX_ASSETS: usize = 30;
pub const MAX_SOURCES: usize = 8;
/// Learnings passed to the planner per cycle
pub const PLANNER_LEARNINGS: usize = 3;

/// The four stages of a cycle, in execution order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Analyze,
    Plan,
    Produce,
    Learn,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Analyze, Stage::Plan, Stage::Produce, Stage::Learn];

    pub fn index(&self) -> usize {
        match self {
            Self::Analyze => 0,
            Self::Plan => 1,
            Self::Produce => 2,
            Self::Learn => 3,
        }
    }

    /// Dashboard card title
    pub fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "Trends",
            Self::Plan => "Planner",
            Self::Produce => "Studio",
            Self::Learn => "Growth",
        }
    }
}

/// Coarse loop status derived from state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    Idle,
    Analyzing,
    Planning,
    Producing,
    Learning,
    /// Active, between cycles
    Waiting,
}

impl LoopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Planning => "planning",
            Self::Producing => "producing",
            Self::Learning => "learning",
            Self::Waiting => "waiting",
        }
    }
}

#[derive(Debug)]
pub(crate) struct LoopState {
    pub active: bool,
    pub stage: Stage,
    pub logs: RollingBuffer<LogEntry>,
    pub assets: RollingBuffer<ContentAsset>,
    pub sources: RollingBuffer<TrendSource>,
    /// Newest first
    pub learnings: Vec<Learning>,
    pub cycles_completed: u64,
    pub cycle_in_flight: bool,
    pub next_cycle_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// A driver task exists and will observe `active` at its next boundary
    pub driver_running: bool,
    /// Restarted while the driver was between cycles: skip the wait
    pub restart_pending: bool,
    next_log_id: u64,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            active: false,
            stage: Stage::Analyze,
            logs: RollingBuffer::new(MAX_LOGS),
            assets: RollingBuffer::new(MAX_ASSETS),
            sources: RollingBuffer::new(MAX_SOURCES),
            learnings: Vec::new(),
            cycles_completed: 0,
            cycle_in_flight: false,
            next_cycle_at: None,
            last_error: None,
            driver_running: false,
            restart_pending: false,
            next_log_id: 1,
        }
    }
}

impl LoopState {
    /// Append a loop log entry and mirror it to tracing
    pub fn push_log(&mut self, message: impl Into<String>, severity: LogSeverity) {
        let message = message.into();
        match severity {
            LogSeverity::Warning => tracing::warn!(target: "contentloop::loop", "{}", message),
            _ => tracing::info!(target: "contentloop::loop", "{}", message),
        }

        let entry = LogEntry {
            id: self.next_log_id,
            message,
            severity,
            timestamp: Utc::now(),
        };
        self.next_log_id += 1;
        self.logs.push_front(entry);
    }

    pub fn planner_learnings(&self) -> Vec<Learning> {
        self.learnings
            .iter()
            .take(PLANNER_LEARNINGS)
            .cloned()
            .collect()
    }

    pub fn status(&self) -> LoopStatus {
        if self.cycle_in_flight {
            return match self.stage {
                Stage::Analyze => LoopStatus::Analyzing,
                Stage::Plan => LoopStatus::Planning,
                Stage::Produce => LoopStatus::Producing,
                Stage::Learn => LoopStatus::Learning,
            };
        }
        if self.active {
            LoopStatus::Waiting
        } else {
            LoopStatus::Idle
        }
    }

    pub fn snapshot(&self) -> LoopSnapshot {
        LoopSnapshot {
            active: self.active,
            status: self.status(),
            stage: self.stage,
            stage_index: self.stage.index(),
            logs: self.logs.to_vec(),
            assets: self.assets.to_vec(),
            sources: self.sources.to_vec(),
            learnings: self.learnings.clone(),
            cycles_completed: self.cycles_completed,
            cycle_in_flight: self.cycle_in_flight,
            next_cycle_at: self.next_cycle_at,
            last_error: self.last_error.clone(),
        }
    }
}

/// Consistent copy of loop state for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopSnapshot {
    pub active: bool,
    pub status: LoopStatus,
    pub stage: Stage,
    pub stage_index: usize,
    /// Newest first
    pub logs: Vec<LogEntry>,
    /// Newest first
    pub assets: Vec<ContentAsset>,
    pub sources: Vec<TrendSource>,
    pub learnings: Vec<Learning>,
    pub cycles_completed: u64,
    pub cycle_in_flight: bool,
    pub next_cycle_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Default for LoopSnapshot {
    fn default() -> Self {
        LoopState::default().snapshot()
    }
}
