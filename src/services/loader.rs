//! Loader - Tokio Fetch Bridge
//!
//! Fetches run on a tokio runtime; their results are posted back as
//! [`PagerEvent`]s over a crossbeam channel and applied by whoever owns the
//! window.
//!
//! ## Pattern
//!
//! ```text
//! owning context                 tokio runtime
//!       │
//!  dispatch(ticket) ──spawn──►  timeout(source.fetch(range))
//!       │                              │
//!       │◄──── PagerEvent (channel) ───┘
//!       ▼
//!  apply_loaded_items / fail_load
//! ```

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use tokio::runtime::Handle;

use crate::error::Error;
use crate::services::events::PagerEvent;
use crate::services::source::ItemSource;
use crate::state::window_controller::LoadTicket;

/// Runs fetches for load tickets
pub struct Loader<S: ItemSource> {
    source: Arc<S>,
    runtime: Handle,
    tx: Sender<PagerEvent<S::Item>>,
    fetch_timeout: Duration,
}

impl<S: ItemSource> Loader<S> {
    /// Create a loader spawning onto `runtime`
    pub fn new(
        source: Arc<S>,
        runtime: Handle,
        tx: Sender<PagerEvent<S::Item>>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            runtime,
            tx,
            fetch_timeout,
        }
    }

    /// Spawn the fetch for `ticket`; its completion arrives on the channel
    pub fn dispatch(&self, ticket: LoadTicket) {
        let fetch = self.source.fetch(ticket.range);
        let tx = self.tx.clone();
        let timeout = self.fetch_timeout;

        tracing::debug!(range = %ticket.range, direction = %ticket.direction, "dispatching fetch");
        self.runtime.spawn(async move {
            let event = match tokio::time::timeout(timeout, fetch).await {
                Ok(Ok(items)) => PagerEvent::Loaded { ticket, items },
                Ok(Err(error)) => PagerEvent::Failed { ticket, error },
                Err(_) => PagerEvent::Failed {
                    ticket,
                    error: Error::Timeout {
                        message: format!("fetch {} exceeded {:?}", ticket.range, timeout),
                    },
                },
            };

            if tx.send(event).is_err() {
                tracing::debug!(range = %ticket.range, "pager dropped before fetch completed");
            }
        });
    }
}

impl<S: ItemSource> std::fmt::Debug for Loader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}
