//! Pager Constants
//!
//! Centralized defaults for window sizing, load triggering and the fetch loop.

/// Items per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Pages retained in memory before eviction kicks in
pub const DEFAULT_MAX_PAGES_IN_MEMORY: usize = 3;

/// Prefetch margin, in rows, before the end of loaded data
pub const DEFAULT_LOAD_OFFSET_THRESHOLD: usize = 10;

/// Simulated latency of the demo feed
pub const DEFAULT_FEED_LATENCY_MS: u64 = 200;

/// Upper bound on a single fetch before it is reported as failed
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// How long the demo binary waits for a page before giving up
pub const DEMO_WAIT_SECS: u64 = 30;
