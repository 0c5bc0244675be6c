//! Sequence Feed
//!
//! An in-process [`ItemSource`] yielding the absolute index of every item,
//! after an artificial delay. Useful for demos and for exercising the
//! loading sentinels.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::domain::config::FeedConfig;
use crate::domain::page::Range;
use crate::error::Result;
use crate::services::source::ItemSource;

/// Feed of consecutive integers
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceFeed {
    latency: Duration,
    total_items: Option<usize>,
}

impl SequenceFeed {
    /// Unbounded feed answering after `latency`
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            total_items: None,
        }
    }

    /// Stop the sequence after `total_items` items
    pub fn with_total_items(mut self, total_items: usize) -> Self {
        self.total_items = Some(total_items);
        self
    }

    /// Build from configuration
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.latency_ms),
            total_items: config.total_items,
        }
    }

    /// Items of `range` that exist in the sequence
    fn items(&self, range: Range) -> Vec<usize> {
        let end = match self.total_items {
            Some(total) => (range.to + 1).min(total),
            None => range.to + 1,
        };
        (range.from..end).collect()
    }
}

impl ItemSource for SequenceFeed {
    type Item = usize;

    fn fetch(&self, range: Range) -> BoxFuture<'static, Result<Vec<usize>>> {
        let feed = *self;
        async move {
            if !feed.latency.is_zero() {
                tokio::time::sleep(feed.latency).await;
            }
            Ok(feed.items(range))
        }
        .boxed()
    }
}
