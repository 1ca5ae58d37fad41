//! Loop behavior tests against a scripted in-memory backend

use super::*;
use crate::backend::{AssetGenerator, Planner, TrendSource};
use crate::model::{
    self, ContentPlan, ContentType, GeneratedAsset, Impact, Platform, TrendDescriptor, TrendReport,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
enum GenStep {
    Image,
    NoImage,
    Fail,
}

/// Backend whose answers are scripted up front
///
/// Plans are built fresh on every planner call so hooks identify the call
/// (`"c{call}-p{index}"`). Generator steps are consumed in order; once the
/// script runs out every plan gets an image.
struct ScriptedBackend {
    plans_per_call: usize,
    naturalness: Option<u8>,
    content_type: ContentType,
    sources_per_call: usize,
    fail_trends: AtomicBool,
    gen_steps: Mutex<VecDeque<GenStep>>,
    /// Planner blocks on this until notified
    plan_gate: Option<Arc<Notify>>,
    trend_calls: AtomicU32,
    plan_calls: AtomicU32,
    gen_calls: AtomicU32,
    seen_learnings: Mutex<Vec<Vec<Learning>>>,
    /// Stage observed by each collaborator call, in order
    seen_stages: Mutex<Vec<Stage>>,
    observer: OnceLock<Orchestrator>,
}

impl ScriptedBackend {
    fn new(plans_per_call: usize) -> Self {
        Self {
            plans_per_call,
            naturalness: Some(90),
            content_type: ContentType::Landscape,
            sources_per_call: 2,
            fail_trends: AtomicBool::new(false),
            gen_steps: Mutex::new(VecDeque::new()),
            plan_gate: None,
            trend_calls: AtomicU32::new(0),
            plan_calls: AtomicU32::new(0),
            gen_calls: AtomicU32::new(0),
            seen_learnings: Mutex::new(Vec::new()),
            seen_stages: Mutex::new(Vec::new()),
            observer: OnceLock::new(),
        }
    }

    fn with_steps(self, steps: &[GenStep]) -> Self {
        *self.gen_steps.lock().unwrap() = steps.iter().copied().collect();
        self
    }

    fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.plan_gate = Some(gate);
        self
    }

    fn record_stage(&self) {
        if let Some(orchestrator) = self.observer.get() {
            self.seen_stages
                .lock()
                .unwrap()
                .push(orchestrator.snapshot().stage);
        }
    }
}

#[async_trait]
impl TrendSource for ScriptedBackend {
    async fn analyze_trends(&self) -> Result<TrendReport, BackendError> {
        self.trend_calls.fetch_add(1, Ordering::SeqCst);
        self.record_stage();

        if self.fail_trends.load(Ordering::SeqCst) {
            return Err(BackendError::Network("trend source unreachable".to_string()));
        }

        Ok(TrendReport {
            trends: vec![TrendDescriptor {
                trend_name: Some("Ferry sunsets".to_string()),
                ..TrendDescriptor::default()
            }],
            sources: (0..self.sources_per_call)
                .map(|i| model::TrendSource {
                    uri: format!("https://source.example/{}", i),
                    title: None,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Planner for ScriptedBackend {
    async fn plan(
        &self,
        trends: &[TrendDescriptor],
        learnings: &[Learning],
    ) -> Result<Vec<ContentPlan>, BackendError> {
        let call = self.plan_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.record_stage();
        self.seen_learnings.lock().unwrap().push(learnings.to_vec());
        assert_eq!(trends.len(), 1);

        if let Some(gate) = &self.plan_gate {
            gate.notified().await;
        }

        Ok((0..self.plans_per_call)
            .map(|i| ContentPlan {
                platform: Platform::Instagram,
                content_type: self.content_type,
                location: "Galata".to_string(),
                action: "dusk walk".to_string(),
                hook: format!("c{}-p{}", call, i),
                caption: "caption".to_string(),
                predicted_naturalness: self.naturalness,
                audio_description: None,
            })
            .collect())
    }
}

#[async_trait]
impl AssetGenerator for ScriptedBackend {
    async fn generate_asset(&self, _plan: &ContentPlan) -> Result<GeneratedAsset, BackendError> {
        self.gen_calls.fetch_add(1, Ordering::SeqCst);
        self.record_stage();

        let step = self
            .gen_steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(GenStep::Image);

        match step {
            GenStep::Image => Ok(GeneratedAsset {
                image: Some("data:image/png;base64,AAAA".to_string()),
                video: None,
            }),
            GenStep::NoImage => Ok(GeneratedAsset::default()),
            GenStep::Fail => Err(BackendError::Api {
                status: 500,
                message: "render farm on fire".to_string(),
            }),
        }
    }
}

/// No settle delays, and a next cycle far enough out to never fire in a test
fn test_timing() -> LoopTiming {
    LoopTiming {
        settle_delay: Duration::ZERO,
        generation_pause: Duration::ZERO,
        cycle_interval: Duration::from_secs(3600),
    }
}

fn orchestrator(backend: &Arc<ScriptedBackend>) -> Orchestrator {
    let collaborators = Collaborators {
        trends: backend.clone(),
        planner: backend.clone(),
        generator: backend.clone(),
    };
    let orchestrator = Orchestrator::new(collaborators, test_timing());
    let _ = backend.observer.set(orchestrator.clone());
    orchestrator
}

async fn wait_until(orchestrator: &Orchestrator, pred: impl Fn(&LoopSnapshot) -> bool) -> LoopSnapshot {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = orchestrator.snapshot();
            if pred(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    waited.expect("condition not reached in time")
}

fn count(snapshot: &LoopSnapshot, severity: LogSeverity) -> usize {
    snapshot.logs.iter().filter(|l| l.severity == severity).count()
}

fn learning(i: usize) -> Learning {
    Learning {
        id: format!("l{}", i),
        category: "Visual".to_string(),
        insight: format!("insight {}", i),
        impact: Impact::Positive,
    }
}

#[tokio::test]
async fn full_cycle_produces_one_asset_and_schedules_next() {
    let backend = Arc::new(ScriptedBackend::new(1));
    let orchestrator = orchestrator(&backend);

    assert!(orchestrator.start());
    let snapshot = wait_until(&orchestrator, |s| {
        s.cycles_completed == 1 && s.next_cycle_at.is_some()
    })
    .await;

    assert!(snapshot.active);
    assert_eq!(snapshot.status, LoopStatus::Waiting);
    assert_eq!(snapshot.stage, Stage::Learn);
    assert_eq!(snapshot.assets.len(), 1);

    let asset = &snapshot.assets[0];
    assert_eq!(asset.content_type, ContentType::Landscape);
    assert_eq!(asset.metrics.naturalness_score, 90);
    assert_eq!(asset.metrics.risk_score, 10);

    assert_eq!(count(&snapshot, LogSeverity::Success), 1);
    assert!(count(&snapshot, LogSeverity::Info) >= 3);
    assert_eq!(count(&snapshot, LogSeverity::Warning), 0);
    assert_eq!(snapshot.sources.len(), 2);

    let stages = backend.seen_stages.lock().unwrap().clone();
    assert_eq!(stages, vec![Stage::Analyze, Stage::Plan, Stage::Produce]);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn stop_on_inactive_loop_changes_nothing() {
    let backend = Arc::new(ScriptedBackend::new(1));
    let orchestrator = orchestrator(&backend);

    let before = orchestrator.snapshot();
    assert!(!orchestrator.stop());
    assert!(!orchestrator.stop());
    assert_eq!(orchestrator.snapshot(), before);
}

#[tokio::test]
async fn run_cycle_is_noop_when_inactive() {
    let backend = Arc::new(ScriptedBackend::new(1));
    let orchestrator = orchestrator(&backend);

    assert!(matches!(orchestrator.run_cycle().await, CycleOutcome::Skipped));
    assert_eq!(backend.trend_calls.load(Ordering::SeqCst), 0);
    assert!(orchestrator.snapshot().logs.is_empty());
}

#[tokio::test]
async fn empty_plan_list_reaches_learn() {
    let backend = Arc::new(ScriptedBackend::new(0));
    let orchestrator = orchestrator(&backend);

    let report = match orchestrator.run_single().await {
        CycleOutcome::Completed(report) => report,
        other => panic!("expected a completed cycle, got {:?}", other),
    };
    assert_eq!(report.plans, 0);
    assert_eq!(report.assets, 0);

    let snapshot = orchestrator.snapshot();
    assert!(snapshot.assets.is_empty());
    assert_eq!(snapshot.stage, Stage::Learn);
    assert_eq!(snapshot.cycles_completed, 1);
    assert_eq!(backend.gen_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_image_drops_plan_silently() {
    let backend = Arc::new(ScriptedBackend::new(1).with_steps(&[GenStep::NoImage]));
    let orchestrator = orchestrator(&backend);

    orchestrator.run_single().await;

    let snapshot = orchestrator.snapshot();
    assert!(snapshot.assets.is_empty());
    assert_eq!(count(&snapshot, LogSeverity::Success), 0);
    assert_eq!(count(&snapshot, LogSeverity::Warning), 0);
    assert_eq!(snapshot.cycles_completed, 1);
}

#[tokio::test]
async fn generator_failure_keeps_earlier_assets() {
    let backend = Arc::new(ScriptedBackend::new(4).with_steps(&[
        GenStep::Image,
        GenStep::Image,
        GenStep::Fail,
        GenStep::Image,
    ]));
    let orchestrator = orchestrator(&backend);

    orchestrator.start();
    let snapshot = wait_until(&orchestrator, |s| s.last_error.is_some() && !s.cycle_in_flight).await;

    assert!(!snapshot.active);
    assert_eq!(snapshot.status, LoopStatus::Idle);
    assert!(snapshot.next_cycle_at.is_none());
    assert_eq!(snapshot.cycles_completed, 0);

    // Newest first: the second plan's asset leads
    let hooks: Vec<&str> = snapshot.assets.iter().map(|a| a.hook.as_str()).collect();
    assert_eq!(hooks, vec!["c1-p1", "c1-p0"]);

    // The fourth plan was never attempted
    assert_eq!(backend.gen_calls.load(Ordering::SeqCst), 3);

    let front = &snapshot.logs[0];
    assert_eq!(front.severity, LogSeverity::Warning);
    assert!(front.message.contains("render farm on fire"));
    assert_eq!(count(&snapshot, LogSeverity::Warning), 1);
}

#[tokio::test]
async fn trend_failure_halts_without_touching_assets() {
    let backend = Arc::new(ScriptedBackend::new(2));
    let orchestrator = orchestrator(&backend);

    orchestrator.run_single().await;
    let before = orchestrator.snapshot();
    assert_eq!(before.assets.len(), 2);

    backend.fail_trends.store(true, Ordering::SeqCst);
    orchestrator.start();
    let after = wait_until(&orchestrator, |s| s.last_error.is_some() && !s.cycle_in_flight).await;

    assert_eq!(after.assets, before.assets);
    assert!(!after.active);
    assert!(after.next_cycle_at.is_none());
    assert_eq!(
        count(&after, LogSeverity::Warning),
        count(&before, LogSeverity::Warning) + 1
    );
    assert_eq!(after.logs[0].severity, LogSeverity::Warning);
    assert_eq!(backend.plan_calls.load(Ordering::SeqCst), 1);

    // Nothing scheduled: no further trend calls
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.trend_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn restart_after_failure_begins_fresh_cycle() {
    let backend = Arc::new(ScriptedBackend::new(1));
    backend.fail_trends.store(true, Ordering::SeqCst);
    let orchestrator = orchestrator(&backend);

    orchestrator.start();
    wait_until(&orchestrator, |s| !s.active && s.last_error.is_some()).await;

    backend.fail_trends.store(false, Ordering::SeqCst);
    assert!(orchestrator.start());
    let snapshot = wait_until(&orchestrator, |s| s.cycles_completed == 1).await;

    assert!(snapshot.last_error.is_none());
    assert_eq!(snapshot.assets.len(), 1);
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn asset_buffer_evicts_oldest() {
    let backend = Arc::new(ScriptedBackend::new(12));
    let orchestrator = orchestrator(&backend);

    for _ in 0..3 {
        orchestrator.run_single().await;
    }

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.assets.len(), MAX_ASSETS);
    assert_eq!(snapshot.assets[0].hook, "c3-p11");
    // 36 produced, the first 6 of cycle one evicted
    assert_eq!(snapshot.assets[MAX_ASSETS - 1].hook, "c1-p6");
    assert!(snapshot.logs.len() <= MAX_LOGS);
}

#[tokio::test]
async fn sources_are_replaced_and_capped() {
    let mut backend = ScriptedBackend::new(0);
    backend.sources_per_call = 12;
    let backend = Arc::new(backend);
    let orchestrator = orchestrator(&backend);

    orchestrator.run_single().await;
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.sources.len(), MAX_SOURCES);
    assert_eq!(snapshot.sources[0].uri, "https://source.example/0");
}

#[tokio::test]
async fn planner_sees_first_three_learnings() {
    let backend = Arc::new(ScriptedBackend::new(1));
    let orchestrator = orchestrator(&backend);
    orchestrator.seed_learnings((1..=5).map(learning).collect());

    orchestrator.run_single().await;

    let seen = backend.seen_learnings.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    let ids: Vec<&str> = seen[0].iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["l1", "l2", "l3"]);

    // The loop never rewrites learnings
    assert_eq!(orchestrator.snapshot().learnings.len(), 5);
}

#[tokio::test]
async fn stop_mid_cycle_lets_cycle_finish() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(ScriptedBackend::new(2).with_gate(gate.clone()));
    let orchestrator = orchestrator(&backend);

    orchestrator.start();
    wait_until(&orchestrator, |s| s.stage == Stage::Plan && s.cycle_in_flight).await;

    assert!(orchestrator.stop());
    assert_eq!(orchestrator.snapshot().status, LoopStatus::Planning);
    gate.notify_one();

    let snapshot = wait_until(&orchestrator, |s| !s.cycle_in_flight).await;
    assert_eq!(snapshot.cycles_completed, 1);
    assert_eq!(snapshot.assets.len(), 2);
    assert!(!snapshot.active);
    assert!(snapshot.next_cycle_at.is_none());
    assert!(snapshot.last_error.is_none());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.trend_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_during_wait_cancels_next_cycle() {
    let backend = Arc::new(ScriptedBackend::new(1));
    let orchestrator = orchestrator(&backend);

    orchestrator.start();
    wait_until(&orchestrator, |s| s.next_cycle_at.is_some()).await;

    orchestrator.stop();
    let snapshot = orchestrator.snapshot();
    assert!(!snapshot.active);
    assert!(snapshot.next_cycle_at.is_none());
    assert_eq!(snapshot.status, LoopStatus::Idle);

    // Starting again runs the next cycle without waiting out the interval
    assert!(orchestrator.start());
    wait_until(&orchestrator, |s| s.cycles_completed == 2).await;
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn toggle_flips_activity() {
    let backend = Arc::new(ScriptedBackend::new(0));
    let orchestrator = orchestrator(&backend);

    assert!(orchestrator.toggle());
    assert!(orchestrator.is_active());
    assert!(!orchestrator.toggle());
    assert!(!orchestrator.is_active());
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn start_twice_is_single_flight() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(ScriptedBackend::new(1).with_gate(gate.clone()));
    let orchestrator = orchestrator(&backend);

    assert!(orchestrator.start());
    assert!(!orchestrator.start());
    wait_until(&orchestrator, |s| s.stage == Stage::Plan).await;

    // A manual cycle cannot overlap the driver's
    assert!(matches!(orchestrator.run_cycle().await, CycleOutcome::Skipped));
    assert!(matches!(orchestrator.run_single().await, CycleOutcome::Skipped));

    gate.notify_one();
    wait_until(&orchestrator, |s| s.cycles_completed == 1).await;
    assert_eq!(backend.trend_calls.load(Ordering::SeqCst), 1);
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn shutdown_aborts_in_flight_cycle() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(ScriptedBackend::new(1).with_gate(gate));
    let orchestrator = orchestrator(&backend);

    orchestrator.start();
    wait_until(&orchestrator, |s| s.stage == Stage::Plan).await;

    orchestrator.shutdown().await;
    let snapshot = orchestrator.snapshot();
    assert!(!snapshot.active);
    assert!(!snapshot.cycle_in_flight);
    assert_eq!(snapshot.cycles_completed, 0);
}

#[tokio::test]
async fn default_naturalness_when_plan_has_none() {
    let mut backend = ScriptedBackend::new(1);
    backend.naturalness = None;
    let backend = Arc::new(backend);
    let orchestrator = orchestrator(&backend);

    orchestrator.run_single().await;
    let asset = &orchestrator.snapshot().assets[0];
    assert_eq!(asset.metrics.naturalness_score, crate::model::DEFAULT_NATURALNESS);
    assert_eq!(asset.metrics.risk_score, 4);
}
