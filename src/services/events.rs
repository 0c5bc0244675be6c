//! Pager Events
//!
//! Messages posted by the loader back to the context that owns the window.

use crate::domain::page::Range;
use crate::error::Error;
use crate::state::window_controller::LoadTicket;

/// Completion of one fetch
#[derive(Debug)]
pub enum PagerEvent<T> {
    /// The source produced the ticket's items
    Loaded { ticket: LoadTicket, items: Vec<T> },

    /// The source failed or timed out
    Failed { ticket: LoadTicket, error: Error },
}

impl<T> PagerEvent<T> {
    /// Ticket the event answers
    pub fn ticket(&self) -> &LoadTicket {
        match self {
            PagerEvent::Loaded { ticket, .. } | PagerEvent::Failed { ticket, .. } => ticket,
        }
    }
}

/// What handling a [`PagerEvent`] did to the window
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was inserted at `key`
    Applied { key: usize, range: Range },
    /// The fetch failed; the load was abandoned and may be retried
    Failed { range: Range, reason: String },
    /// The result belonged to an earlier window generation
    Discarded { range: Range },
    /// An empty batch past the last page; the sequence has ended
    EndOfData { range: Range },
    /// The window refused the page; the load was abandoned
    Rejected { range: Range, reason: String },
}
