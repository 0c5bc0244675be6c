//! Paging Session
//!
//! Wires a [`WindowController`] to a [`Loader`]: scroll reports that cross a
//! threshold dispatch fetches, and completed fetches are applied when the
//! owning context pumps the event channel.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tokio::runtime::Handle;

use crate::domain::config::WindowConfig;
use crate::domain::page::LoadDirection;
use crate::error::{Error, Result};
use crate::services::events::{LoadOutcome, PagerEvent};
use crate::services::loader::Loader;
use crate::services::source::ItemSource;
use crate::state::load_trigger::ScrollReport;
use crate::state::window_controller::{LoadTicket, ScrollResponse, WindowController};

/// A paginated list backed by an item source
pub struct PagingSession<S: ItemSource> {
    controller: WindowController<S::Item>,
    loader: Loader<S>,
    rx: Receiver<PagerEvent<S::Item>>,
}

impl<S: ItemSource> PagingSession<S> {
    /// Create a session whose fetches run on `runtime`
    pub fn new(
        config: WindowConfig,
        source: S,
        runtime: Handle,
        fetch_timeout: Duration,
    ) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        Ok(Self {
            controller: WindowController::new(config)?,
            loader: Loader::new(Arc::new(source), runtime, tx, fetch_timeout),
            rx,
        })
    }

    // ==================== Getters ====================

    pub fn controller(&self) -> &WindowController<S::Item> {
        &self.controller
    }

    /// Mutable access, e.g. to register load listeners
    pub fn controller_mut(&mut self) -> &mut WindowController<S::Item> {
        &mut self.controller
    }

    // ==================== Driving ====================

    /// Fetch the first page
    pub fn start(&mut self) -> Result<LoadTicket> {
        tracing::info!(config = ?self.controller.config(), "starting paging session");
        self.bootstrap()
    }

    /// Pull-to-refresh: drop the window and fetch the first page again
    ///
    /// Scroll triggering stays suppressed until that page is applied or fails.
    pub fn refresh(&mut self) -> Result<LoadTicket> {
        self.controller.refresh();
        self.controller.set_refreshing(true);
        self.bootstrap()
    }

    fn bootstrap(&mut self) -> Result<LoadTicket> {
        let ticket = self.controller.begin_load(LoadDirection::Down)?;
        self.loader.dispatch(ticket);
        Ok(ticket)
    }

    /// Feed a scroll event, dispatching a fetch when it triggers one
    pub fn on_scroll(&mut self, report: &ScrollReport) -> ScrollResponse {
        let response = self.controller.on_scroll(report);
        if let Some(ticket) = response.load {
            self.loader.dispatch(ticket);
        }
        response
    }

    /// Apply every completion already waiting, without blocking
    ///
    /// A page the window refuses shows up as [`LoadOutcome::Rejected`] and
    /// the remaining completions are still applied.
    pub fn pump(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            outcomes.push(self.handle(event));
        }
        outcomes
    }

    /// Block until the next completion arrives and apply it
    ///
    /// Returns `None` if nothing arrived within `timeout`.
    pub fn wait_next(&mut self, timeout: Duration) -> Result<Option<LoadOutcome>> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(self.handle(event))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::ChannelSend {
                message: "loader channel closed".into(),
            }),
        }
    }

    fn handle(&mut self, event: PagerEvent<S::Item>) -> LoadOutcome {
        let outcome = match event {
            PagerEvent::Loaded { ticket, items } => {
                match self.controller.apply_loaded_items(&ticket, items) {
                    Ok(Some(key)) => LoadOutcome::Applied {
                        key,
                        range: ticket.range,
                    },
                    Ok(None) => LoadOutcome::EndOfData {
                        range: ticket.range,
                    },
                    Err(Error::StaleApply { .. }) => {
                        return LoadOutcome::Discarded {
                            range: ticket.range,
                        };
                    }
                    Err(error) => {
                        tracing::warn!(range = %ticket.range, %error, "page rejected");
                        LoadOutcome::Rejected {
                            range: ticket.range,
                            reason: error.to_string(),
                        }
                    }
                }
            }
            PagerEvent::Failed { ticket, error } => {
                tracing::warn!(range = %ticket.range, %error, "fetch failed");
                // fail_load only refuses tickets that are no longer current
                if self.controller.fail_load(&ticket).is_err() {
                    return LoadOutcome::Discarded {
                        range: ticket.range,
                    };
                }
                LoadOutcome::Failed {
                    range: ticket.range,
                    reason: error.to_string(),
                }
            }
        };

        // Every current ticket has settled by now, including the refresh one
        if self.controller.load_state().refreshing {
            self.controller.set_refreshing(false);
        }
        outcome
    }
}

impl<S: ItemSource> std::fmt::Debug for PagingSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingSession")
            .field("controller", &self.controller)
            .field("loader", &self.loader)
            .field("pending", &self.rx.len())
            .finish()
    }
}
