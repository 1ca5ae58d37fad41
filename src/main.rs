// contentloop - autonomous content generation loop
//
// Repeatedly asks a generative backend for local trends, turns them into
// content plans, renders an image per plan and publishes the result into a
// rolling feed with synthesized engagement metrics.
//
// Architecture:
// - Orchestrator: owns loop state and the driver task (analyze, plan, produce, learn)
// - Backend: trend source, planner and asset generator behind async traits
//   (Gemini over HTTP, or an offline demo generator)
// - TUI (ratatui): dashboard that polls orchestrator snapshots
// - API (axum): localhost JSON read/toggle access to the same orchestrator
// - Logging: tracing, captured in memory for the TUI or written to stderr

mod api;
mod backend;
mod cli;
mod config;
mod logging;
mod model;
mod orchestrator;
mod startup;
mod tui;
mod util;

use anyhow::{Context, Result};
use cli::CliAction;
use config::Config;
use logging::LogBuffer;
use orchestrator::{CycleOutcome, Orchestrator};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<()> {
    // Config subcommands are handled entirely inside the CLI module
    let (overrides, single_cycle) = match cli::handle_cli() {
        CliAction::Done => return Ok(()),
        CliAction::Run(overrides) => (overrides, false),
        CliAction::Cycle(overrides) => (overrides, true),
    };

    Config::ensure_config_exists();
    let mut config = Config::from_env();
    overrides.apply(&mut config);

    // The guard flushes the file writer on drop and must outlive every log call
    let log_buffer = LogBuffer::new();
    let _log_guard = logging::init_tracing(&config.logging, config.enable_tui, &log_buffer);

    let (collaborators, backend_label) =
        backend::create_collaborators(&config.backend, &config.persona, config.demo_mode);
    let orchestrator = Orchestrator::new(collaborators, config.timing.loop_timing());
    orchestrator.seed_learnings(
        config
            .learnings
            .iter()
            .enumerate()
            .map(|(i, seed)| seed.to_learning(i))
            .collect(),
    );

    if single_cycle {
        return run_single_cycle(&orchestrator).await;
    }

    startup::print_startup(&config, &backend_label);
    startup::log_startup(&config, &backend_label);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let api_handle = if config.api.enabled {
        let bind_addr = config.api.bind_addr;
        let api_orchestrator = orchestrator.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = api::start_api(bind_addr, api_orchestrator, shutdown_rx).await {
                tracing::error!("API server failed: {:#}", e);
            }
        }))
    } else {
        drop(shutdown_rx);
        None
    };

    if config.autostart {
        orchestrator.start();
    }

    if config.enable_tui {
        let persona = format!("{} · {}", config.persona.name, config.persona.market);
        if let Err(e) =
            tui::run_tui(orchestrator.clone(), log_buffer, &config.theme, persona).await
        {
            eprintln!("TUI error: {:#}", e);
        }
    } else {
        if !config.autostart {
            tracing::info!("Loop idle; start it with --autostart or POST /api/loop/start");
        }
        tracing::info!("Running headless, press Ctrl+C to stop");
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
    }

    tracing::info!("Shutting down...");
    orchestrator.shutdown().await;

    let _ = shutdown_tx.send(());
    if let Some(handle) = api_handle {
        let _ = handle.await;
    }

    Ok(())
}

/// Run one cycle and print the resulting state as JSON on stdout
async fn run_single_cycle(orchestrator: &Orchestrator) -> Result<()> {
    let outcome = orchestrator.run_single().await;

    let snapshot = orchestrator.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize loop state")?;
    println!("{}", json);

    match outcome {
        CycleOutcome::Completed(report) => {
            tracing::info!(
                trends = report.trends,
                plans = report.plans,
                assets = report.assets,
                "Cycle complete"
            );
            Ok(())
        }
        CycleOutcome::Aborted(e) => Err(anyhow::Error::new(e).context("Cycle aborted")),
        CycleOutcome::Skipped => anyhow::bail!("Cycle skipped: loop already running"),
    }
}
