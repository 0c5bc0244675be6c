//! Page - Items, Ranges and Load Directions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction in which the window grows when a load completes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadDirection {
    /// Towards the origin (prepend a page)
    Up,
    /// Away from the origin (append a page)
    Down,
}

impl fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDirection::Up => write!(f, "up"),
            LoadDirection::Down => write!(f, "down"),
        }
    }
}

/// Inclusive range of absolute item indices to fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

impl Range {
    /// Create a new inclusive range
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Number of items covered (`to - from + 1`)
    pub fn len(&self) -> usize {
        self.to - self.from + 1
    }

    /// Ranges are never empty; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over every absolute index in the range
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.from..=self.to
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

/// A loaded page: a contiguous run of at most `page_size` items
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    start: usize,
    items: Vec<T>,
}

impl<T> Page<T> {
    /// Create a page whose first item sits at absolute index `start`
    pub fn new(start: usize, items: Vec<T>) -> Self {
        Self { start, items }
    }

    /// Absolute index of the first item
    pub fn start(&self) -> usize {
        self.start
    }

    /// Items in order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by its position inside the page
    pub fn get(&self, local: usize) -> Option<&T> {
        self.items.get(local)
    }
}
