//! Scroll Pager Library
//!
//! A windowed, bidirectional pagination cache for infinitely scrollable
//! lists. Only a bounded number of contiguous pages is held in memory,
//! while the list surface sees one stable, gap-free virtual index space.

pub mod constants;
pub mod domain;
pub mod error;
pub mod services;
pub mod state;
pub mod utils;

pub use domain::config::{AppConfig, FeedConfig, WindowConfig};
pub use domain::page::{LoadDirection, Page, Range};
pub use error::{Error, Result};
pub use state::load_trigger::{Decision, LoadState, LoadTrigger, ScrollClamp, ScrollReport};
pub use state::page_window::PageWindow;
pub use state::window_controller::{ItemViewKind, LoadTicket, ScrollResponse, WindowController};
