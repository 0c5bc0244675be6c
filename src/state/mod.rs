//! State - Window and Load State
//!
//! Everything here is synchronous and owned by a single context: the page
//! window, the next-range calculation, the scroll trigger, and the
//! controller tying them together.

pub mod load_trigger;
pub mod page_window;
pub mod range;
pub mod window_controller;
