//! LoadTrigger - Scroll-Driven Load Decisions
//!
//! Turns scroll reports from the list surface into at most one outstanding
//! load request, and decides when the viewport has to be snapped back to
//! the start of the window.

use crate::domain::page::LoadDirection;
use crate::error::{Error, Result};

/// Load bookkeeping shared by the trigger and the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadState {
    /// Direction of the outstanding load, if any
    pub direction: Option<LoadDirection>,
    /// A fetch is in flight; no other may be issued
    pub loading: bool,
    /// Pull-to-refresh in progress; scroll triggering is suppressed
    pub refreshing: bool,
}

impl LoadState {
    /// Direction of the in-flight load, `None` when idle
    pub fn in_flight(&self) -> Option<LoadDirection> {
        if self.loading { self.direction } else { None }
    }
}

/// Outcome of a scroll report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    None,
    RequestUp,
    RequestDown,
}

impl Decision {
    /// Direction requested, if any
    pub fn direction(self) -> Option<LoadDirection> {
        match self {
            Decision::None => None,
            Decision::RequestUp => Some(LoadDirection::Up),
            Decision::RequestDown => Some(LoadDirection::Down),
        }
    }
}

/// One scroll event as reported by the list surface, in virtual indices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollReport {
    /// Signed scroll distance; negative scrolls towards the origin
    pub scroll_delta: i32,
    /// First row with any part on screen
    pub first_visible: usize,
    /// Last row with any part on screen
    pub last_visible: usize,
    /// First row entirely on screen
    pub first_fully_visible: usize,
}

/// Window geometry the trigger decides against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowExtent {
    /// Virtual row count, sentinel included
    pub total_virtual_count: usize,
    /// Start of the earliest retained page
    pub offset: usize,
    /// The sequence ended at the bottom of the window
    pub exhausted: bool,
}

/// Forced scroll target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollClamp {
    pub keep_at: usize,
}

/// Decides when and in which direction to load more data
#[derive(Clone, Debug)]
pub struct LoadTrigger {
    load_offset_threshold: usize,
    state: LoadState,
}

impl LoadTrigger {
    /// Create an idle trigger with the given prefetch margin
    pub fn new(load_offset_threshold: usize) -> Self {
        Self {
            load_offset_threshold,
            state: LoadState::default(),
        }
    }

    /// Current load state
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Prefetch margin in rows
    pub fn load_offset_threshold(&self) -> usize {
        self.load_offset_threshold
    }

    /// Check if a fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Check if a refresh is in progress
    pub fn is_refreshing(&self) -> bool {
        self.state.refreshing
    }

    /// Evaluate a scroll event
    ///
    /// Returns a request at most once until [`LoadTrigger::complete_load`]
    /// runs. Reports arriving while loading or refreshing are ignored,
    /// including ones scrolling the other way.
    pub fn on_scroll(&mut self, report: &ScrollReport, extent: WindowExtent) -> Decision {
        if self.state.loading || self.state.refreshing {
            return Decision::None;
        }

        let threshold = self.load_offset_threshold;
        let decision = if report.scroll_delta < 0 {
            let near_top = report.first_visible <= threshold + extent.offset;
            if near_top && extent.offset > 0 {
                Decision::RequestUp
            } else {
                Decision::None
            }
        } else if report.scroll_delta > 0 {
            let remaining = extent.total_virtual_count.saturating_sub(report.last_visible);
            if remaining <= threshold && !extent.exhausted {
                Decision::RequestDown
            } else {
                Decision::None
            }
        } else {
            Decision::None
        };

        if let Some(direction) = decision.direction() {
            tracing::debug!(%direction, ?report, "scroll triggered load");
            self.state.direction = Some(direction);
            self.state.loading = true;
        }
        decision
    }

    /// Mark a load as started outside of scrolling (bootstrap, refresh)
    pub fn start(&mut self, direction: LoadDirection) -> Result<()> {
        if let Some(in_flight) = self.state.in_flight() {
            return Err(Error::LoadInFlight {
                direction: in_flight,
            });
        }
        self.state.direction = Some(direction);
        self.state.loading = true;
        Ok(())
    }

    /// The outstanding load was applied (or abandoned)
    pub fn complete_load(&mut self) {
        self.state.loading = false;
        self.state.direction = None;
    }

    /// Suppress or re-enable scroll triggering for a pull-to-refresh
    ///
    /// Clearing the flag also resets the load direction.
    pub fn set_refreshing(&mut self, refreshing: bool) {
        self.state.refreshing = refreshing;
        if !refreshing {
            self.complete_load();
        }
    }

    /// Back to `{None, false, false}`
    pub fn reset(&mut self) {
        self.state = LoadState::default();
    }

    /// Snap target when the viewport shows rows before the window start
    pub fn clamp_scroll_position(
        first_fully_visible: usize,
        window_offset: usize,
    ) -> Option<ScrollClamp> {
        (first_fully_visible < window_offset).then_some(ScrollClamp {
            keep_at: window_offset,
        })
    }

    /// Scroll distance the surface may apply
    ///
    /// Upward scrolling stops dead once the boundary row is the first fully
    /// visible one.
    pub fn clamp_scroll_delta(scroll_delta: i32, first_fully_visible: usize, boundary: usize) -> i32 {
        if scroll_delta < 0 && first_fully_visible <= boundary {
            0
        } else {
            scroll_delta
        }
    }
}

impl Default for LoadTrigger {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_LOAD_OFFSET_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroll(scroll_delta: i32, first_visible: usize, last_visible: usize) -> ScrollReport {
        ScrollReport {
            scroll_delta,
            first_visible,
            last_visible,
            first_fully_visible: first_visible,
        }
    }

    fn extent(total_virtual_count: usize, offset: usize) -> WindowExtent {
        WindowExtent {
            total_virtual_count,
            offset,
            exhausted: false,
        }
    }

    #[test]
    fn test_down_triggers_near_end() {
        let mut trigger = LoadTrigger::new(10);
        assert_eq!(trigger.on_scroll(&scroll(5, 20, 49), extent(60, 0)), Decision::None);
        assert_eq!(
            trigger.on_scroll(&scroll(5, 21, 50), extent(60, 0)),
            Decision::RequestDown
        );
        let state = trigger.state();
        assert!(state.loading);
        assert_eq!(state.direction, Some(LoadDirection::Down));
    }

    #[test]
    fn test_single_request_until_complete() {
        let mut trigger = LoadTrigger::new(10);
        let report = scroll(5, 50, 59);
        assert_eq!(trigger.on_scroll(&report, extent(60, 0)), Decision::RequestDown);
        for _ in 0..10 {
            assert_eq!(trigger.on_scroll(&report, extent(61, 0)), Decision::None);
        }
        // Reversing while loading is ignored too
        assert_eq!(trigger.on_scroll(&scroll(-5, 20, 29), extent(61, 20)), Decision::None);

        trigger.complete_load();
        assert_eq!(trigger.state(), LoadState::default());
        assert_eq!(trigger.on_scroll(&report, extent(60, 0)), Decision::RequestDown);
    }

    #[test]
    fn test_up_requires_offset() {
        let mut trigger = LoadTrigger::new(10);
        assert_eq!(trigger.on_scroll(&scroll(-5, 0, 9), extent(60, 0)), Decision::None);
        assert_eq!(trigger.on_scroll(&scroll(-5, 31, 40), extent(80, 20)), Decision::None);
        assert_eq!(
            trigger.on_scroll(&scroll(-5, 30, 39), extent(80, 20)),
            Decision::RequestUp
        );
        assert_eq!(trigger.state().direction, Some(LoadDirection::Up));
    }

    #[test]
    fn test_zero_delta_never_triggers() {
        let mut trigger = LoadTrigger::new(10);
        assert_eq!(trigger.on_scroll(&scroll(0, 50, 59), extent(60, 20)), Decision::None);
    }

    #[test]
    fn test_exhausted_blocks_down() {
        let mut trigger = LoadTrigger::new(10);
        let extent = WindowExtent {
            total_virtual_count: 25,
            offset: 0,
            exhausted: true,
        };
        assert_eq!(trigger.on_scroll(&scroll(5, 15, 24), extent), Decision::None);
        assert!(!trigger.is_loading());
    }

    #[test]
    fn test_refreshing_suppresses() {
        let mut trigger = LoadTrigger::new(10);
        trigger.set_refreshing(true);
        assert_eq!(trigger.on_scroll(&scroll(5, 50, 59), extent(60, 0)), Decision::None);

        trigger.set_refreshing(false);
        assert_eq!(trigger.on_scroll(&scroll(5, 50, 59), extent(60, 0)), Decision::RequestDown);
    }

    #[test]
    fn test_clearing_refresh_resets_direction() {
        let mut trigger = LoadTrigger::new(10);
        trigger.start(LoadDirection::Down).expect("start");
        trigger.set_refreshing(true);
        trigger.set_refreshing(false);
        assert_eq!(trigger.state(), LoadState::default());
    }

    #[test]
    fn test_start_rejects_second_load() {
        let mut trigger = LoadTrigger::new(10);
        trigger.start(LoadDirection::Up).expect("start");
        assert!(matches!(
            trigger.start(LoadDirection::Down),
            Err(Error::LoadInFlight {
                direction: LoadDirection::Up
            })
        ));
    }

    #[test]
    fn test_clamp_scroll_position() {
        assert_eq!(
            LoadTrigger::clamp_scroll_position(15, 20),
            Some(ScrollClamp { keep_at: 20 })
        );
        assert_eq!(LoadTrigger::clamp_scroll_position(25, 20), None);
        assert_eq!(LoadTrigger::clamp_scroll_position(20, 20), None);
    }

    #[test]
    fn test_clamp_scroll_delta() {
        assert_eq!(LoadTrigger::clamp_scroll_delta(-8, 20, 20), 0);
        assert_eq!(LoadTrigger::clamp_scroll_delta(-8, 21, 20), -8);
        assert_eq!(LoadTrigger::clamp_scroll_delta(8, 20, 20), 8);
    }
}
