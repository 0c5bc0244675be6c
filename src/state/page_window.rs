//! PageWindow - Bounded Store of Contiguous Pages
//!
//! Holds the pages currently in memory, keyed by the absolute index of
//! their first item. Keys are multiples of `page_size` and always form a
//! contiguous run, so a real index (position inside the concatenation of
//! retained pages) maps to a page by plain division.
//!
//! ```text
//!  virtual: 0 ............ 19 | 20 ...... 39 | 40 ...... 59 | 60 ...... 79
//!           (unmaterialized)  |   page 20    |   page 40    |   page 60
//!  real:                      | 0 ....... 19 | 20 ...... 39 | 40 ...... 59
//! ```
//!
//! Capacity is enforced by the caller: evict with [`PageWindow::evict_one`]
//! when `len() + 1 > max_pages`, then [`PageWindow::add_page`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::page::{LoadDirection, Page};
use crate::error::{Error, Result};

/// Serializable summary of the window, for diagnostics
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WindowSnapshot {
    /// Start of the earliest retained page
    pub offset: usize,
    /// Items across all pages
    pub real_count: usize,
    /// `(start, len)` per page, in key order
    pub pages: Vec<(usize, usize)>,
}

/// Ordered, contiguous set of in-memory pages
#[derive(Clone, Debug)]
pub struct PageWindow<T> {
    page_size: usize,
    pages: BTreeMap<usize, Page<T>>,
    end_reached: bool,
}

impl<T> PageWindow<T> {
    /// Create an empty window. `page_size` must be non-zero.
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid("page_size must be greater than 0"));
        }
        Ok(Self {
            page_size,
            pages: BTreeMap::new(),
            end_reached: false,
        })
    }

    // ==================== Queries ====================

    /// Items per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of retained pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page is retained
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Sum of item counts across all pages
    pub fn real_count(&self) -> usize {
        self.pages.values().map(Page::len).sum()
    }

    /// Smallest key, or 0 when empty
    pub fn offset(&self) -> usize {
        self.first_key().unwrap_or(0)
    }

    /// Start of the earliest retained page
    pub fn first_key(&self) -> Option<usize> {
        self.pages.keys().next().copied()
    }

    /// Start of the latest retained page
    pub fn last_key(&self) -> Option<usize> {
        self.pages.keys().next_back().copied()
    }

    /// The latest retained page
    pub fn last_page(&self) -> Option<&Page<T>> {
        self.pages.values().next_back()
    }

    /// Whether the sequence ends at the bottom of the window
    ///
    /// Either the trailing page came back short, or an empty batch was
    /// loaded after it (see [`PageWindow::mark_end`]).
    pub fn is_exhausted(&self) -> bool {
        self.end_reached
            || self
                .last_page()
                .is_some_and(|page| page.len() < self.page_size)
    }

    /// Item at a real index (0 = first item of the earliest page)
    pub fn item_at(&self, real_index: usize) -> Result<&T> {
        let out_of_range = || Error::IndexOutOfRange {
            index: real_index,
            count: self.real_count(),
        };

        let start = self.offset() + (real_index / self.page_size) * self.page_size;
        self.pages
            .get(&start)
            .and_then(|page| page.get(real_index % self.page_size))
            .ok_or_else(out_of_range)
    }

    /// Read-only view of every page in key order
    pub fn all_pages(&self) -> impl Iterator<Item = &Page<T>> {
        self.pages.values()
    }

    /// Diagnostic summary
    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            offset: self.offset(),
            real_count: self.real_count(),
            pages: self.pages.values().map(|p| (p.start(), p.len())).collect(),
        }
    }

    // ==================== Mutations ====================

    /// Key the next page would take when loaded in `direction`
    ///
    /// An empty window always starts at 0, whatever the direction.
    pub fn next_key(&self, direction: LoadDirection) -> Result<usize> {
        let (Some(first), Some(last)) = (self.first_key(), self.last_key()) else {
            return Ok(0);
        };

        match direction {
            LoadDirection::Down => Ok(last + self.page_size),
            LoadDirection::Up => first.checked_sub(self.page_size).ok_or_else(|| {
                Error::invalid_insert("cannot prepend a page before the origin")
            }),
        }
    }

    /// Insert a page next to the current run, returning its key
    pub fn add_page(&mut self, items: Vec<T>, direction: LoadDirection) -> Result<usize> {
        let key = self.next_key(direction)?;
        self.insert_at(key, items)?;
        Ok(key)
    }

    /// Insert a page at an explicit key, checking alignment and contiguity
    pub fn insert_at(&mut self, key: usize, items: Vec<T>) -> Result<()> {
        self.check_insert(key, items.len())?;
        tracing::debug!(key, len = items.len(), "page added");
        self.pages.insert(key, Page::new(key, items));
        Ok(())
    }

    /// Check that a page of `len` items could be inserted at `key`
    ///
    /// Any aligned key is accepted on an empty window. Otherwise the page
    /// must be non-empty and sit directly before or after the current run,
    /// a page may not follow a short page, and a page prepended to the run
    /// must be full.
    pub fn check_insert(&self, key: usize, len: usize) -> Result<()> {
        if len > self.page_size {
            return Err(Error::invalid_insert(format!(
                "page holds {len} items, page size is {}",
                self.page_size
            )));
        }
        if key % self.page_size != 0 {
            return Err(Error::invalid_insert(format!(
                "key {key} is not a multiple of {}",
                self.page_size
            )));
        }
        if self.pages.contains_key(&key) {
            return Err(Error::invalid_insert(format!("page {key} already present")));
        }
        let (Some(first), Some(last)) = (self.first_key(), self.last_key()) else {
            return Ok(());
        };

        if len == 0 {
            return Err(Error::invalid_insert(format!(
                "empty page {key} next to [{first}, {last}]"
            )));
        }
        if key + self.page_size == first {
            if len < self.page_size {
                return Err(Error::invalid_insert(format!(
                    "short page {key} would leave a gap before page {first}"
                )));
            }
        } else if last + self.page_size == key {
            if self.is_exhausted() {
                return Err(Error::invalid_insert(format!(
                    "page {key} would follow the end of the sequence"
                )));
            }
        } else {
            return Err(Error::invalid_insert(format!(
                "page {key} is not adjacent to [{first}, {last}]"
            )));
        }
        Ok(())
    }

    /// Record that nothing follows the last page
    ///
    /// Used when a downward load comes back empty on a page boundary.
    pub fn mark_end(&mut self) {
        tracing::debug!(last = ?self.last_key(), "end of sequence reached");
        self.end_reached = true;
    }

    /// Drop the page at the end opposite to `direction`
    ///
    /// Loading down evicts the earliest page, loading up evicts the latest.
    pub fn evict_one(&mut self, direction: LoadDirection) -> Option<Page<T>> {
        let evicted = match direction {
            LoadDirection::Down => self.pages.pop_first(),
            LoadDirection::Up => self.pages.pop_last(),
        };
        let (key, page) = evicted?;
        if direction == LoadDirection::Up {
            self.end_reached = false;
        }
        tracing::debug!(key, %direction, "page evicted");
        Some(page)
    }

    /// Remove every page
    pub fn clear(&mut self) {
        self.pages.clear();
        self.end_reached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(range: std::ops::Range<u32>) -> Vec<u32> {
        range.collect()
    }

    fn window_with_keys(keys: &[usize]) -> PageWindow<u32> {
        let mut window = PageWindow::new(20).expect("window");
        for &key in keys {
            let start = key as u32;
            window.insert_at(key, page(start..start + 20)).expect("insert");
        }
        window
    }

    #[test]
    fn test_empty_window() {
        let window: PageWindow<u32> = PageWindow::new(20).expect("window");
        assert_eq!(window.offset(), 0);
        assert_eq!(window.real_count(), 0);
        assert!(!window.is_exhausted());
        assert!(matches!(
            window.item_at(0),
            Err(Error::IndexOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_add_down_then_read() {
        let mut window = PageWindow::new(20).expect("window");
        assert_eq!(window.add_page(page(0..20), LoadDirection::Down).expect("add"), 0);
        assert_eq!(window.add_page(page(20..40), LoadDirection::Down).expect("add"), 20);

        assert_eq!(window.offset(), 0);
        assert_eq!(window.real_count(), 40);
        // 6th item of the second page
        assert_eq!(*window.item_at(25).expect("item"), 25);
        assert!(window.item_at(40).is_err());
    }

    #[test]
    fn test_first_page_ignores_direction() {
        let mut window = PageWindow::new(20).expect("window");
        assert_eq!(window.add_page(page(0..20), LoadDirection::Up).expect("add"), 0);
    }

    #[test]
    fn test_offset_shifts_real_indices() {
        let window = window_with_keys(&[20, 40, 60]);
        assert_eq!(window.offset(), 20);
        assert_eq!(window.real_count(), 60);
        assert_eq!(*window.item_at(0).expect("item"), 20);
        assert_eq!(*window.item_at(59).expect("item"), 79);
    }

    #[test]
    fn test_add_up_prepends() {
        let mut window = window_with_keys(&[40]);
        assert_eq!(window.add_page(page(20..40), LoadDirection::Up).expect("add"), 20);
        assert_eq!(window.offset(), 20);
        assert_eq!(*window.item_at(0).expect("item"), 20);
    }

    #[test]
    fn test_add_up_at_origin_fails() {
        let mut window = window_with_keys(&[0]);
        assert!(matches!(
            window.add_page(page(0..20), LoadDirection::Up),
            Err(Error::InvalidInsert { .. })
        ));
    }

    #[test]
    fn test_insert_rejects_gap_and_duplicate() {
        let mut window = window_with_keys(&[20]);
        assert!(window.insert_at(60, page(60..80)).is_err());
        assert!(window.insert_at(20, page(20..40)).is_err());
        assert!(window.insert_at(25, page(25..45)).is_err());
        assert!(window.insert_at(40, page(40..60)).is_ok());
    }

    #[test]
    fn test_oversized_page_rejected() {
        let mut window = PageWindow::new(20).expect("window");
        assert!(window.add_page(page(0..21), LoadDirection::Down).is_err());
        assert!(window.is_empty());
    }

    #[test]
    fn test_short_page_marks_exhausted() {
        let mut window = PageWindow::new(20).expect("window");
        window.add_page(page(0..20), LoadDirection::Down).expect("add");
        window.add_page(page(20..25), LoadDirection::Down).expect("add");
        assert!(window.is_exhausted());
        assert_eq!(window.real_count(), 25);
        assert_eq!(*window.item_at(24).expect("item"), 24);
        assert!(window.item_at(25).is_err());
        assert!(window.add_page(page(40..60), LoadDirection::Down).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            PageWindow::<u32>::new(0),
            Err(Error::Invalid { .. })
        ));
    }

    #[test]
    fn test_empty_page_only_bootstraps() {
        let mut window = PageWindow::new(20).expect("window");
        window.insert_at(0, Vec::<u32>::new()).expect("insert");
        assert!(window.is_exhausted());

        let mut window = window_with_keys(&[0]);
        assert!(window.insert_at(20, Vec::new()).is_err());
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_check_insert_leaves_window_alone() {
        let window = window_with_keys(&[0, 20, 40]);
        assert!(window.check_insert(60, 21).is_err());
        assert!(window.check_insert(60, 20).is_ok());
        assert_eq!(window.snapshot().pages, vec![(0, 20), (20, 20), (40, 20)]);
    }

    #[test]
    fn test_mark_end() {
        let mut window = window_with_keys(&[0, 20]);
        window.mark_end();
        assert!(window.is_exhausted());
        assert!(window.add_page(page(40..60), LoadDirection::Down).is_err());

        // Dropping the last page forgets where the sequence ended
        window.evict_one(LoadDirection::Up);
        assert!(!window.is_exhausted());

        window.mark_end();
        window.clear();
        assert!(!window.is_exhausted());
    }

    #[test]
    fn test_short_up_page_rejected() {
        let mut window = window_with_keys(&[40]);
        assert!(window.add_page(page(30..40), LoadDirection::Up).is_err());
    }

    #[test]
    fn test_evict_opposite_end() {
        let mut window = window_with_keys(&[20, 40, 60]);
        let evicted = window.evict_one(LoadDirection::Down).expect("evict");
        assert_eq!(evicted.start(), 20);
        assert_eq!(window.offset(), 40);

        let evicted = window.evict_one(LoadDirection::Up).expect("evict");
        assert_eq!(evicted.start(), 60);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut window = window_with_keys(&[20, 40]);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.offset(), 0);
        assert!(window.evict_one(LoadDirection::Down).is_none());
    }

    #[test]
    fn test_snapshot() {
        let window = window_with_keys(&[20, 40]);
        let snapshot = window.snapshot();
        assert_eq!(snapshot.offset, 20);
        assert_eq!(snapshot.real_count, 40);
        assert_eq!(snapshot.pages, vec![(20, 20), (40, 20)]);
    }

    fn arbitrary_direction() -> impl Strategy<Value = LoadDirection> {
        prop_oneof![Just(LoadDirection::Up), Just(LoadDirection::Down)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Bounded adds keep the window contiguous, within capacity and readable
        #[test]
        fn bounded_adds_keep_invariants(
            page_size in 1usize..8,
            max_pages in 1usize..5,
            start_page in 0usize..10,
            directions in prop::collection::vec(arbitrary_direction(), 1..40),
        ) {
            let mut window: PageWindow<usize> = PageWindow::new(page_size).expect("window");
            let origin = start_page * page_size;
            window.insert_at(origin, (origin..origin + page_size).collect()).expect("seed");

            for direction in directions {
                let Ok(key) = window.next_key(direction) else {
                    continue;
                };
                if window.len() + 1 > max_pages {
                    window.evict_one(direction);
                }
                window.insert_at(key, (key..key + page_size).collect()).expect("insert");

                prop_assert!(window.len() <= max_pages);
                let keys: Vec<usize> = window.all_pages().map(Page::start).collect();
                prop_assert_eq!(window.offset(), keys[0]);
                for pair in keys.windows(2) {
                    prop_assert_eq!(pair[1], pair[0] + page_size);
                }
                prop_assert_eq!(
                    window.real_count(),
                    window.all_pages().map(Page::len).sum::<usize>()
                );
                for real in 0..window.real_count() {
                    prop_assert_eq!(*window.item_at(real).expect("item"), window.offset() + real);
                }
            }
        }
    }
}
