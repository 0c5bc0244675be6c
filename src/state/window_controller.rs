//! WindowController - Window + Load State Facade
//!
//! Owns the page window and the load trigger. The list surface talks to it
//! in virtual indices; completed fetches come back through
//! [`WindowController::apply_loaded_items`] on the same context.
//!
//! ## Load cycle
//!
//! ```text
//! on_scroll / begin_load ──► LoadTicket { generation, direction, range }
//!                                  │
//!                         fetch runs elsewhere
//!                                  │
//!                                  ▼
//! apply_loaded_items(ticket, items): validate ─► evict (if full) ─► insert ─► complete_load
//! ```
//!
//! `refresh()` bumps the generation, so tickets issued before it are
//! rejected as stale instead of landing in the new window.

use std::fmt;

use crate::domain::config::WindowConfig;
use crate::domain::page::{LoadDirection, Page, Range};
use crate::error::{Error, Result};
use crate::state::load_trigger::{
    Decision, LoadState, LoadTrigger, ScrollClamp, ScrollReport, WindowExtent,
};
use crate::state::page_window::{PageWindow, WindowSnapshot};
use crate::state::range::next_range;

/// What the list surface should draw at a virtual index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemViewKind {
    /// A loaded item, at this real index
    Item(usize),
    /// Loading row above the window while an upward load is in flight
    LoadingSentinelTop,
    /// Loading row after the last item while a downward load is in flight
    LoadingSentinelBottom,
    /// Unmaterialized row before the window start
    Vacant,
}

/// Handle for one outstanding load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    /// Window generation the load was issued against
    pub generation: u64,
    /// Side of the window the page goes to
    pub direction: LoadDirection,
    /// Absolute indices to fetch
    pub range: Range,
}

/// Reaction to a scroll report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollResponse {
    /// Load to dispatch, if the scroll crossed a threshold
    pub load: Option<LoadTicket>,
    /// Row to snap the viewport back to
    pub keep_at: Option<usize>,
}

type LoadListener = Box<dyn FnMut(LoadDirection, Range) + Send>;

/// Orchestrates the page window and its load state
pub struct WindowController<T> {
    config: WindowConfig,
    window: PageWindow<T>,
    trigger: LoadTrigger,
    generation: u64,
    listeners: Vec<LoadListener>,
}

impl<T> WindowController<T> {
    /// Create a controller with an empty window
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            window: PageWindow::new(config.page_size)?,
            trigger: LoadTrigger::new(config.load_offset_threshold),
            generation: 0,
            listeners: Vec::new(),
        })
    }

    /// Register a callback fired whenever scrolling starts a load
    pub fn on_load_more(&mut self, listener: impl FnMut(LoadDirection, Range) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ==================== Getters ====================

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn window(&self) -> &PageWindow<T> {
        &self.window
    }

    pub fn load_state(&self) -> LoadState {
        self.trigger.state()
    }

    /// Incremented by every refresh
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn offset(&self) -> usize {
        self.window.offset()
    }

    pub fn real_count(&self) -> usize {
        self.window.real_count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.window.is_exhausted()
    }

    pub fn all_pages(&self) -> impl Iterator<Item = &Page<T>> {
        self.window.all_pages()
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.window.snapshot()
    }

    /// Virtual row count: offset, loaded items, and the bottom sentinel
    pub fn total_virtual_count(&self) -> usize {
        let sentinel = usize::from(self.trigger.state().in_flight() == Some(LoadDirection::Down));
        self.window.offset() + self.window.real_count() + sentinel
    }

    fn extent(&self) -> WindowExtent {
        WindowExtent {
            total_virtual_count: self.total_virtual_count(),
            offset: self.window.offset(),
            exhausted: self.window.is_exhausted(),
        }
    }

    // ==================== Index Resolution ====================

    /// Row kind at a virtual index
    pub fn item_view_kind(&self, virtual_index: usize) -> Result<ItemViewKind> {
        let total = self.total_virtual_count();
        if virtual_index >= total {
            return Err(Error::IndexOutOfRange {
                index: virtual_index,
                count: total,
            });
        }

        let offset = self.window.offset();
        let kind = match self.trigger.state().in_flight() {
            Some(LoadDirection::Down) if virtual_index == total - 1 => {
                ItemViewKind::LoadingSentinelBottom
            }
            Some(LoadDirection::Up) if offset > 0 && virtual_index == offset - 1 => {
                ItemViewKind::LoadingSentinelTop
            }
            _ if virtual_index < offset => ItemViewKind::Vacant,
            _ => ItemViewKind::Item(virtual_index - offset),
        };
        Ok(kind)
    }

    /// Item bound to a virtual index
    pub fn item(&self, virtual_index: usize) -> Result<&T> {
        match self.item_view_kind(virtual_index)? {
            ItemViewKind::Item(real_index) => self.window.item_at(real_index),
            _ => Err(Error::IndexOutOfRange {
                index: virtual_index,
                count: self.total_virtual_count(),
            }),
        }
    }

    /// Item at a real index
    pub fn item_at(&self, real_index: usize) -> Result<&T> {
        self.window.item_at(real_index)
    }

    // ==================== Scrolling ====================

    /// Earliest row the viewport may show
    ///
    /// The top sentinel sits one row above the window while loading up.
    pub fn scroll_boundary(&self) -> usize {
        let offset = self.window.offset();
        match self.trigger.state().in_flight() {
            Some(LoadDirection::Up) => offset.saturating_sub(1),
            _ => offset,
        }
    }

    /// Snap target when the first fully visible row is above the boundary
    pub fn clamp_scroll(&self, first_fully_visible: usize) -> Option<ScrollClamp> {
        LoadTrigger::clamp_scroll_position(first_fully_visible, self.scroll_boundary())
    }

    /// Scroll distance the surface may apply for a pending gesture
    pub fn clamp_scroll_delta(&self, scroll_delta: i32, first_fully_visible: usize) -> i32 {
        LoadTrigger::clamp_scroll_delta(scroll_delta, first_fully_visible, self.scroll_boundary())
    }

    /// Feed one scroll event; returns the load to start and any snap target
    pub fn on_scroll(&mut self, report: &ScrollReport) -> ScrollResponse {
        let extent = self.extent();
        let load = match self.trigger.on_scroll(report, extent) {
            Decision::None => None,
            decision => decision.direction().and_then(|direction| self.issue(direction)),
        };

        if let Some(ticket) = load {
            for listener in &mut self.listeners {
                listener(ticket.direction, ticket.range);
            }
        }

        ScrollResponse {
            load,
            keep_at: self
                .clamp_scroll(report.first_fully_visible)
                .map(|clamp| clamp.keep_at),
        }
    }

    fn issue(&mut self, direction: LoadDirection) -> Option<LoadTicket> {
        match self.request_next(direction) {
            Ok(range) => Some(self.ticket(direction, range)),
            Err(error) => {
                tracing::warn!(%direction, %error, "dropping triggered load");
                self.trigger.complete_load();
                None
            }
        }
    }

    fn ticket(&self, direction: LoadDirection, range: Range) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
            direction,
            range,
        }
    }

    // ==================== Loading ====================

    /// Range the next load in `direction` should fetch; no state change
    pub fn request_next(&self, direction: LoadDirection) -> Result<Range> {
        next_range(&self.window, direction)
    }

    /// Start a load explicitly, e.g. the bootstrap page after a refresh
    pub fn begin_load(&mut self, direction: LoadDirection) -> Result<LoadTicket> {
        let range = self.request_next(direction)?;
        self.trigger.start(direction)?;
        tracing::debug!(%direction, %range, generation = self.generation, "load started");
        Ok(self.ticket(direction, range))
    }

    fn check_current(&self, ticket: &LoadTicket) -> Result<()> {
        if ticket.generation != self.generation {
            return Err(Error::stale(format!(
                "ticket generation {} but window is at {}",
                ticket.generation, self.generation
            )));
        }
        match self.trigger.state().in_flight() {
            Some(direction) if direction == ticket.direction => Ok(()),
            Some(direction) => Err(Error::stale(format!(
                "{} result while a {direction} load is in flight",
                ticket.direction
            ))),
            None => Err(Error::stale(format!(
                "{} result with no load in flight",
                ticket.direction
            ))),
        }
    }

    /// Apply a completed fetch, evicting first if the window is full
    ///
    /// Returns the key of the inserted page, or `None` when an empty Down
    /// batch marked the end of the sequence. Stale tickets and pages the
    /// window would refuse are rejected without touching the window.
    pub fn apply_loaded_items(
        &mut self,
        ticket: &LoadTicket,
        items: Vec<T>,
    ) -> Result<Option<usize>> {
        if let Err(error) = self.check_current(ticket) {
            tracing::warn!(range = %ticket.range, %error, "discarding load result");
            return Err(error);
        }

        let result = self.insert(ticket, items);
        self.trigger.complete_load();
        result
    }

    fn insert(&mut self, ticket: &LoadTicket, items: Vec<T>) -> Result<Option<usize>> {
        let key = self.window.next_key(ticket.direction)?;
        if key != ticket.range.from {
            return Err(Error::stale(format!(
                "range {} no longer extends the window (next key {key})",
                ticket.range
            )));
        }

        if items.is_empty() && ticket.direction == LoadDirection::Down && !self.window.is_empty() {
            self.window.mark_end();
            return Ok(None);
        }

        // Eviction only removes the page at the far end, so a page accepted
        // now is still accepted afterwards
        self.window.check_insert(key, items.len())?;
        if self.window.len() + 1 > self.config.max_pages_in_memory {
            self.window.evict_one(ticket.direction);
        }
        self.window.insert_at(key, items)?;
        Ok(Some(key))
    }

    /// Abandon the current load after a failed fetch
    pub fn fail_load(&mut self, ticket: &LoadTicket) -> Result<()> {
        self.check_current(ticket)?;
        tracing::debug!(range = %ticket.range, "load abandoned");
        self.trigger.complete_load();
        Ok(())
    }

    /// Drop every page and reset the load state
    ///
    /// Outstanding tickets become stale. The caller then starts the
    /// bootstrap load with `begin_load(LoadDirection::Down)`.
    pub fn refresh(&mut self) {
        self.window.clear();
        self.trigger.reset();
        self.generation += 1;
        tracing::info!(generation = self.generation, "window refreshed");
    }

    /// Toggle pull-to-refresh suppression
    pub fn set_refreshing(&mut self, refreshing: bool) {
        self.trigger.set_refreshing(refreshing);
    }
}

impl<T> fmt::Debug for WindowController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowController")
            .field("config", &self.config)
            .field("window", &self.window.snapshot())
            .field("state", &self.trigger.state())
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
