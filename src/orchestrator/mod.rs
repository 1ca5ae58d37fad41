//! Orchestration loop: analyze → plan → produce → learn
//!
//! A single driver task runs cycles back to back with a fixed wait in between.
//! Each cycle calls the collaborators in order and folds their results into
//! bounded buffers:
//!
//! ```text
//! start() ──► driver ──► run_cycle ──► wait(cycle_interval) ──► run_cycle ...
//!                          │
//!                          ├─ Analyze  trends + sources (sources replaced, ≤ 8)
//!                          ├─ Plan     plans from trends + first 3 learnings
//!                          ├─ Produce  one asset per plan with an image (≤ 30 kept)
//!                          └─ Learn    placeholder
//! ```
//!
//! `stop()` is cooperative: an in-flight cycle finishes and the driver exits
//! at the next boundary. Any collaborator error aborts the cycle, logs one
//! warning and deactivates the loop.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an await.

mod buffer;
mod state;
mod synth;

#[cfg(test)]
mod tests;

pub use state::{LoopSnapshot, LoopStatus, Stage, MAX_ASSETS, MAX_LOGS, MAX_SOURCES};
pub use synth::synthesize_asset;

use crate::backend::{BackendError, Collaborators};
use crate::model::{Learning, LogSeverity};
use state::LoopState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};

/// Pauses between loop phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTiming {
    /// After Analyze, Plan and Learn
    pub settle_delay: Duration,
    /// After each plan in Produce
    pub generation_pause: Duration,
    /// Between the end of a cycle and the start of the next
    pub cycle_interval: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1500),
            generation_pause: Duration::from_millis(800),
            cycle_interval: Duration::from_secs(15),
        }
    }
}

/// Summary of a completed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub trends: usize,
    pub sources: usize,
    pub plans: usize,
    pub assets: usize,
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// Loop inactive or a cycle already in flight
    Skipped,
    Completed(CycleReport),
    /// A collaborator failed; the loop is now inactive
    Aborted(BackendError),
}

struct Inner {
    collaborators: Collaborators,
    timing: LoopTiming,
    state: Mutex<LoopState>,
    driver: Mutex<Option<JoinHandle<()>>>,
    /// Wakes the driver out of its inter-cycle wait
    wake: Notify,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owner of loop state and the driver task
///
/// Cheap to clone; clones share the same loop.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

/// Clears the in-flight flag however the cycle future ends (including abort)
struct CycleGuard(Arc<Inner>);

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.0.lock().cycle_in_flight = false;
    }
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators, timing: LoopTiming) -> Self {
        Self {
            inner: Arc::new(Inner {
                collaborators,
                timing,
                state: Mutex::new(LoopState::default()),
                driver: Mutex::new(None),
                wake: Notify::new(),
            }),
        }
    }

    /// Replace the learnings passed to the planner (newest first)
    pub fn seed_learnings(&self, learnings: Vec<Learning>) {
        tracing::debug!("Seeded {} learnings", learnings.len());
        self.inner.lock().learnings = learnings;
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    pub fn snapshot(&self) -> LoopSnapshot {
        self.inner.lock().snapshot()
    }

    /// Activate the loop, spawning the driver if none is running
    ///
    /// Returns false if the loop was already active. Must be called within a
    /// tokio runtime.
    pub fn start(&self) -> bool {
        {
            let mut state = self.inner.lock();
            if state.active {
                return false;
            }
            state.active = true;
            state.last_error = None;

            // A live driver picks the loop back up; between cycles it is
            // woken to start a fresh cycle right away
            if state.driver_running {
                if !state.cycle_in_flight {
                    state.restart_pending = true;
                }
                drop(state);
                self.inner.wake.notify_one();
                tracing::info!("Loop resumed");
                return true;
            }
            state.driver_running = true;
        }

        tracing::info!("Loop started");
        let handle = tokio::spawn(self.clone().drive());
        *self
            .inner
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        true
    }

    /// Deactivate the loop; idempotent
    ///
    /// An in-flight cycle runs to completion. Returns false if the loop was
    /// already inactive, in which case nothing changes.
    pub fn stop(&self) -> bool {
        {
            let mut state = self.inner.lock();
            if !state.active {
                return false;
            }
            state.active = false;
            state.next_cycle_at = None;
        }

        self.inner.wake.notify_one();
        tracing::info!("Loop stopped");
        true
    }

    /// Start if inactive, stop if active; returns the new active flag
    pub fn toggle(&self) -> bool {
        if self.is_active() {
            self.stop();
            false
        } else {
            self.start();
            true
        }
    }

    /// Run exactly one cycle outside the driver (used by the `cycle` command)
    pub async fn run_single(&self) -> CycleOutcome {
        {
            let mut state = self.inner.lock();
            if state.active || state.cycle_in_flight {
                return CycleOutcome::Skipped;
            }
            state.active = true;
            state.last_error = None;
        }

        let outcome = self.run_cycle().await;
        self.inner.lock().active = false;
        outcome
    }

    /// Stop the loop and abort the driver task
    pub async fn shutdown(&self) {
        self.stop();

        let handle = self
            .inner
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }

        self.inner.lock().driver_running = false;
        tracing::debug!("Orchestrator shut down");
    }

    /// Run one cycle if the loop is active
    ///
    /// Activity is checked at entry only; a stop() during the cycle lets it
    /// finish.
    pub async fn run_cycle(&self) -> CycleOutcome {
        {
            let mut state = self.inner.lock();
            if !state.active || state.cycle_in_flight {
                return CycleOutcome::Skipped;
            }
            state.cycle_in_flight = true;
            state.restart_pending = false;
            state.next_cycle_at = None;
        }
        let _guard = CycleGuard(self.inner.clone());

        match self.execute_cycle().await {
            Ok(report) => {
                let mut state = self.inner.lock();
                state.cycles_completed += 1;
                tracing::debug!(
                    cycle = state.cycles_completed,
                    trends = report.trends,
                    plans = report.plans,
                    assets = report.assets,
                    "Cycle complete"
                );
                CycleOutcome::Completed(report)
            }
            Err(e) => {
                let mut state = self.inner.lock();
                state.push_log(
                    format!("System error: critical cycle interruption ({})", e),
                    LogSeverity::Warning,
                );
                state.active = false;
                state.next_cycle_at = None;
                state.last_error = Some(e.to_string());
                CycleOutcome::Aborted(e)
            }
        }
    }

    async fn execute_cycle(&self) -> Result<CycleReport, BackendError> {
        let collaborators = &self.inner.collaborators;
        let timing = self.inner.timing;
        let mut report = CycleReport::default();

        // Analyze
        self.enter_stage(Stage::Analyze, "Scanning live trends and local signals...");
        let trends = collaborators.trends.analyze_trends().await?;
        report.trends = trends.trends.len();
        report.sources = trends.sources.len().min(MAX_SOURCES);
        self.inner.lock().sources.replace(trends.sources);
        pause(timing.settle_delay).await;

        // Plan
        let learnings = {
            let state = self.inner.lock();
            state.planner_learnings()
        };
        self.enter_stage(
            Stage::Plan,
            format!("Planning content from {} trends...", report.trends),
        );
        let plans = collaborators.planner.plan(&trends.trends, &learnings).await?;
        report.plans = plans.len();
        pause(timing.settle_delay).await;

        // Produce
        self.enter_stage(
            Stage::Produce,
            format!("Production started: {} plans queued", plans.len()),
        );
        for plan in &plans {
            self.inner.lock().push_log(
                format!("Rendering {} for {}: {}", plan.content_type, plan.platform, plan.hook),
                LogSeverity::Info,
            );

            let generated = collaborators.generator.generate_asset(plan).await?;
            if generated.image.is_some() {
                let asset = synthesize_asset(plan, generated);
                let mut state = self.inner.lock();
                state.push_log(
                    format!(
                        "Published to {} ({}% natural): {}",
                        asset.platform, asset.metrics.naturalness_score, asset.hook
                    ),
                    LogSeverity::Success,
                );
                state.assets.push_front(asset);
                report.assets += 1;
            } else {
                tracing::debug!("No image for '{}', plan dropped", plan.hook);
            }

            pause(timing.generation_pause).await;
        }

        // Learn
        self.enter_stage(Stage::Learn, "Updating behavior model from engagement...");
        pause(timing.settle_delay).await;

        Ok(report)
    }

    fn enter_stage(&self, stage: Stage, message: impl Into<String>) {
        let mut state = self.inner.lock();
        state.stage = stage;
        state.push_log(message, LogSeverity::Info);
    }

    /// Driver task: cycles until the loop is found inactive at a boundary
    async fn drive(self) {
        loop {
            self.run_cycle().await;

            let interval = self.inner.timing.cycle_interval;
            let deadline = {
                let mut state = self.inner.lock();
                if !state.active {
                    state.driver_running = false;
                    state.next_cycle_at = None;
                    break;
                }
                if std::mem::take(&mut state.restart_pending) {
                    continue;
                }
                state.next_cycle_at = chrono::Duration::from_std(interval)
                    .ok()
                    .map(|d| chrono::Utc::now() + d);
                Instant::now() + interval
            };

            if !self.wait_for_next_cycle(deadline).await {
                break;
            }
        }
        tracing::debug!("Loop driver exited");
    }

    /// Wait out the interval; false if the loop was stopped meanwhile
    ///
    /// A stop followed by a start during the wait ends it early.
    async fn wait_for_next_cycle(&self, deadline: Instant) -> bool {
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                _ = self.inner.wake.notified() => {
                    let state = self.inner.lock();
                    if !state.active || state.restart_pending {
                        break;
                    }
                }
            }
        }

        let mut state = self.inner.lock();
        if state.active {
            state.restart_pending = false;
            return true;
        }
        state.driver_running = false;
        state.next_cycle_at = None;
        false
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}
