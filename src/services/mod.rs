//! Service Layer
//!
//! Fetching happens off the owning context. The service layer runs item
//! sources on tokio and hands completions back through a channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    PagingSession                     │
//! │  ┌──────────────────┐        ┌────────────────────┐  │
//! │  │ WindowController │        │ Loader             │  │
//! │  │ (window + state) │        │ (tokio + timeout)  │  │
//! │  └──────────────────┘        └─────────┬──────────┘  │
//! └────────────────▲───────────────────────┼─────────────┘
//!                  │ PagerEvent            ▼
//!                  └──────────────── ItemSource::fetch
//! ```

mod events;
mod feed;
mod loader;
mod session;
mod source;

pub use events::*;
pub use feed::*;
pub use loader::*;
pub use session::*;
pub use source::*;
