//! Focus timer commands.

use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;

use super::Context;
use crate::cli::args::StartArgs;
use crate::error::TomatoError;
use crate::focus::{DailySummary, FocusEngine, Phase};
use crate::output::{format_history, format_today};
use crate::persistence::{self, PersistenceHandle, PersistenceWorker};
use crate::tui;

/// How long to wait for queued writes after the timer screen closes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the timer screen.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the terminal fails.
pub async fn start(ctx: &Context, args: &StartArgs) -> Result<String, TomatoError> {
    let store = persistence::open_store(&ctx.config.storage, &ctx.paths)?;
    let work = args.work_duration(ctx.config.focus.work_minutes);

    let (handle, notices, worker, seed) = match store {
        Some(store) => {
            let seed = persistence::seed_daily_count(store.as_ref()).await;
            let (notice_tx, notice_rx) = mpsc::unbounded_channel();
            let (handle, task) = PersistenceWorker::spawn(store, notice_tx);
            (handle, Some(notice_rx), Some(task), seed)
        }
        None => (PersistenceHandle::disabled(), None, None, 0),
    };

    let mut engine = FocusEngine::new(work, handle);
    engine.seed_completed_work(seed);
    engine.set_goal(args.goal.clone());
    let phase = Phase::from(args.phase);
    if phase != Phase::Work {
        engine.select_phase(phase)?;
    }

    tracing::info!(
        work_minutes = work.minutes(),
        phase = phase.as_str(),
        completed_today = seed,
        "timer opened"
    );
    tui::run(engine, notices, ctx.config.focus.notifications).await?;

    if let Some(worker) = worker {
        match tokio::time::timeout(DRAIN_TIMEOUT, worker).await {
            Ok(Ok(())) => tracing::debug!("persistence worker drained"),
            Ok(Err(e)) => tracing::warn!(error = %e, "persistence worker failed"),
            Err(_) => tracing::warn!("gave up waiting for pending session writes"),
        }
    }

    Ok(String::new())
}

/// Show today's figures.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn today(ctx: &Context) -> Result<String, TomatoError> {
    let count = match persistence::open_store(&ctx.config.storage, &ctx.paths)? {
        Some(store) => store.count_completed_work_sessions_today().await?,
        None => 0,
    };

    let summary = DailySummary::new(count, ctx.config.focus.work_minutes);
    format_today(&summary, Local::now().date_naive(), ctx.format)
}

/// List recent sessions.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn history(ctx: &Context, limit: usize) -> Result<String, TomatoError> {
    let sessions = match persistence::open_store(&ctx.config.storage, &ctx.paths)? {
        Some(store) => store.recent_sessions(limit).await?,
        None => Vec::new(),
    };

    format_history(&sessions, ctx.format)
}
