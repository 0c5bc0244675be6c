//! Scroll Pager - Demo Entry Point
//!
//! Scrolls a simulated viewport down through an integer feed and back up,
//! logging how the window slides. Pass a TOML config path to override the
//! defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use scroll_pager::constants::DEMO_WAIT_SECS;
use scroll_pager::services::{LoadOutcome, PagingSession, SequenceFeed};
use scroll_pager::utils::config_store::load_config;
use scroll_pager::{AppConfig, ScrollReport};

/// Rows on screen at once
const VIEWPORT_ROWS: usize = 10;

/// Rows moved per scroll event
const SCROLL_STEP: usize = 4;

/// Scroll events in each direction
const SCROLL_EVENTS: usize = 60;

fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config: AppConfig = match std::env::args_os().nth(1) {
        Some(path) => load_config(Path::new(&path))
            .with_context(|| format!("failed to load {}", Path::new(&path).display()))?,
        None => AppConfig::default(),
    };

    tracing::info!("Starting scroll pager demo...");

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let mut session = PagingSession::new(
        config.window,
        SequenceFeed::from_config(&config.feed),
        runtime.handle().clone(),
        Duration::from_millis(config.feed.fetch_timeout_ms),
    )?;
    session.controller_mut().on_load_more(|direction, range| {
        tracing::info!(%direction, %range, "loading more");
    });

    session.start()?;
    wait_for_page(&mut session)?;

    let mut first = 0usize;
    for _ in 0..SCROLL_EVENTS {
        let total = session.controller().total_virtual_count();
        let max_first = total.saturating_sub(VIEWPORT_ROWS);
        let next = (first + SCROLL_STEP).min(max_first);
        if next == first {
            break;
        }
        first = scroll(&mut session, SCROLL_STEP as i32, next)?;
    }

    for _ in 0..SCROLL_EVENTS {
        let boundary = session.controller().scroll_boundary();
        let delta = session
            .controller()
            .clamp_scroll_delta(-(SCROLL_STEP as i32), first);
        if delta == 0 || first == 0 {
            tracing::info!(boundary, "reached the top of the window");
            break;
        }
        let next = first.saturating_sub(SCROLL_STEP).max(boundary);
        first = scroll(&mut session, delta, next)?;
    }

    let snapshot = serde_json::to_string(&session.controller().snapshot())?;
    tracing::info!(%snapshot, "final window");
    Ok(())
}

/// Report one scroll event and wait out any load it triggers
fn scroll(session: &mut PagingSession<SequenceFeed>, delta: i32, first: usize) -> anyhow::Result<usize> {
    let report = ScrollReport {
        scroll_delta: delta,
        first_visible: first,
        last_visible: first + VIEWPORT_ROWS - 1,
        first_fully_visible: first,
    };

    let response = session.on_scroll(&report);
    if response.load.is_some() {
        wait_for_page(session)?;
        let snapshot = serde_json::to_string(&session.controller().snapshot())?;
        tracing::info!(%snapshot, first, "window moved");
    }
    Ok(response.keep_at.unwrap_or(first))
}

fn wait_for_page(session: &mut PagingSession<SequenceFeed>) -> anyhow::Result<()> {
    match session.wait_next(Duration::from_secs(DEMO_WAIT_SECS))? {
        Some(LoadOutcome::Failed { range, reason } | LoadOutcome::Rejected { range, reason }) => {
            tracing::warn!(%range, %reason, "page failed to load");
            Ok(())
        }
        Some(LoadOutcome::EndOfData { range }) => {
            tracing::info!(%range, "reached the end of the feed");
            Ok(())
        }
        Some(outcome) => {
            tracing::debug!(?outcome, "page handled");
            Ok(())
        }
        None => bail!("no page arrived within {DEMO_WAIT_SECS}s"),
    }
}
