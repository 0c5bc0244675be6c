//! Domain - Pure Data Structures and Configuration

pub mod config;
pub mod page;
