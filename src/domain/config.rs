//! Config - Pager Configuration

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FEED_LATENCY_MS, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_LOAD_OFFSET_THRESHOLD,
    DEFAULT_MAX_PAGES_IN_MEMORY, DEFAULT_PAGE_SIZE,
};
use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Window sizing and trigger thresholds
    pub window: WindowConfig,
    /// Demo feed and fetch loop settings
    pub feed: FeedConfig,
}

/// Window configuration, fixed once the controller is built
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WindowConfig {
    /// Items per page (> 0)
    pub page_size: usize,
    /// Pages kept in memory (>= 1)
    pub max_pages_in_memory: usize,
    /// Rows before either end of loaded data at which the next page is requested
    pub load_offset_threshold: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages_in_memory: DEFAULT_MAX_PAGES_IN_MEMORY,
            load_offset_threshold: DEFAULT_LOAD_OFFSET_THRESHOLD,
        }
    }
}

impl WindowConfig {
    /// Check the ranges the window arithmetic depends on
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid("page_size must be greater than 0"));
        }
        if self.max_pages_in_memory == 0 {
            return Err(Error::invalid("max_pages_in_memory must be at least 1"));
        }
        Ok(())
    }
}

/// Feed configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// Artificial delay before each page is produced
    pub latency_ms: u64,
    /// Total items available, `None` for an unbounded feed
    pub total_items: Option<usize>,
    /// Fetches running longer than this are reported as failed
    pub fetch_timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_FEED_LATENCY_MS,
            total_items: None,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}
