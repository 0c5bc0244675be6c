//! Next-range calculation
//!
//! Pure function over the window: which absolute indices to fetch next.

use crate::domain::page::{LoadDirection, Range};
use crate::error::{Error, Result};
use crate::state::page_window::PageWindow;

/// The page-wide range that loading in `direction` should fetch
///
/// An empty window always bootstraps with `[0, page_size - 1]`. Asking for
/// an upward range when the window already starts at 0 fails with
/// [`Error::BeforeOrigin`].
pub fn next_range<T>(window: &PageWindow<T>, direction: LoadDirection) -> Result<Range> {
    let page_size = window.page_size();
    let (Some(first), Some(last)) = (window.first_key(), window.last_key()) else {
        return Ok(Range::new(0, page_size - 1));
    };

    match direction {
        LoadDirection::Down => {
            let from = last + page_size;
            Ok(Range::new(from, from + page_size - 1))
        }
        LoadDirection::Up => {
            let to = first.checked_sub(1).ok_or(Error::BeforeOrigin)?;
            Ok(Range::new(to + 1 - page_size, to))
        }
    }
}
