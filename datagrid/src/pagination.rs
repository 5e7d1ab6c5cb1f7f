//! Pagination cursor.

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Current page, page size and the backend's total record count.
///
/// Pages are 1-based. Once a fetch has been applied, `current_page` lies in
/// `1..=last_page()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// First page of an empty result set. A zero page size is bumped to 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// Number of pages the total spans (0 when there are no records).
    pub fn page_count(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest valid page number. Always at least 1.
    pub fn last_page(&self) -> u32 {
        self.page_count().max(1)
    }

    /// Whether `current_page` is a valid page for the known total.
    pub fn is_in_range(&self) -> bool {
        (1..=self.last_page()).contains(&self.current_page)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based inclusive range of record positions shown on the current page,
    /// as in "11-20 of 35".
    pub fn item_range(&self) -> Option<(u64, u64)> {
        let size = u64::from(self.page_size);
        let start = u64::from(self.current_page.saturating_sub(1)) * size + 1;
        if self.total == 0 || start > self.total {
            return None;
        }
        let end = (start + size - 1).min(self.total);
        Some((start, end))
    }
}
