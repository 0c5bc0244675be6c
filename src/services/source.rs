//! Item Sources
//!
//! The fetch collaborator: given an absolute range, produce its items.

use futures::future::{self, BoxFuture, FutureExt};

use crate::domain::page::Range;
use crate::error::Result;

/// Produces the items of a requested range
///
/// A source returns exactly `range.len()` items, or fewer once the
/// sequence has ended. Futures run on the loader's tokio runtime.
pub trait ItemSource: Send + Sync + 'static {
    type Item: Send + 'static;

    /// Fetch every item in `range`
    fn fetch(&self, range: Range) -> BoxFuture<'static, Result<Vec<Self::Item>>>;
}

/// Synchronous source backed by a closure
pub struct FnSource<F> {
    fetch: F,
}

impl<F> FnSource<F> {
    /// Wrap a closure producing a range's items
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F, T> ItemSource for FnSource<F>
where
    F: Fn(Range) -> Result<Vec<T>> + Send + Sync + 'static,
    T: Send + 'static,
{
    type Item = T;

    fn fetch(&self, range: Range) -> BoxFuture<'static, Result<Vec<T>>> {
        future::ready((self.fetch)(range)).boxed()
    }
}
