//! Exhaustive paged enumeration of the review table.
//!
//! `PaginatedScanner::scan` returns a lazy iterator that requests one page at
//! a time and follows the continuation cursor until a page arrives without
//! one. Each call to `scan` starts again from the first page.

use std::collections::VecDeque;

use crate::db::{DatabaseError, PageCursor, ReviewTable, ScanFilter, ScanRequest};
use crate::models::{EnrichedReview, StoredReview};

pub struct PaginatedScanner<'a> {
    table: &'a dyn ReviewTable,
    page_size: usize,
    filter: Option<ScanFilter>,
}

impl<'a> PaginatedScanner<'a> {
    /// A page size of zero is treated as one.
    pub fn new(table: &'a dyn ReviewTable, page_size: usize) -> Self {
        Self {
            table,
            page_size: page_size.max(1),
            filter: None,
        }
    }

    /// Restrict the scan to records matching `filter` (evaluated by the store).
    pub fn with_filter(mut self, filter: ScanFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn scan(&self) -> Scan<'_> {
        Scan {
            scanner: self,
            buffer: VecDeque::new(),
            cursor: None,
            state: ScanState::Start,
            pages: 0,
        }
    }

    /// Drain a full scan and decode every record, skipping malformed ones.
    pub fn collect_reviews(&self) -> Result<CollectedReviews, DatabaseError> {
        let mut collected = CollectedReviews::default();

        for item in self.scan() {
            match item?.decode() {
                Ok(review) => collected.reviews.push(review),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed review record");
                    collected.skipped += 1;
                }
            }
        }

        Ok(collected)
    }
}

/// Decoded reviews from one full scan.
#[derive(Debug, Default)]
pub struct CollectedReviews {
    pub reviews: Vec<EnrichedReview>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Start,
    HasMore,
    Done,
}

/// Lazy iterator over one scan. Finite and not restartable.
pub struct Scan<'s> {
    scanner: &'s PaginatedScanner<'s>,
    buffer: VecDeque<StoredReview>,
    cursor: Option<PageCursor>,
    state: ScanState,
    pages: usize,
}

impl Scan<'_> {
    fn fetch_page(&mut self) -> Result<(), DatabaseError> {
        let request = ScanRequest {
            filter: self.scanner.filter.as_ref(),
            start_after: self.cursor.as_ref(),
            limit: self.scanner.page_size,
        };
        let page = self.scanner.table.scan_page(&request)?;
        self.pages += 1;

        tracing::debug!(
            page = self.pages,
            items = page.items.len(),
            more = page.next.is_some(),
            "Fetched review page"
        );

        self.state = if page.next.is_some() {
            ScanState::HasMore
        } else {
            ScanState::Done
        };
        self.cursor = page.next;
        self.buffer.extend(page.items);
        Ok(())
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<StoredReview, DatabaseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.state == ScanState::Done {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.state = ScanState::Done;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
    }
}
