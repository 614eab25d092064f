/// Which way the user moved when a list was (re)loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Cursor position for a freshly loaded list: first item when moving
    /// forward, last item when moving back.
    pub fn focus_index(self, len: usize) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Backward => len.saturating_sub(1),
        }
    }
}

/// Page position of the repository list. Moving only changes state; the
/// state machine decides when to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingCursor {
    current_page: u32,
    page_size: usize,
    has_more_pages: bool,
    total_estimate: u64,
}

impl PagingCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            has_more_pages: false,
            total_estimate: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more_pages(&self) -> bool {
        self.has_more_pages
    }

    pub fn total_estimate(&self) -> u64 {
        self.total_estimate
    }

    /// Ceiling of the estimate over the page size, at least the current page
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_estimate.div_ceil(self.page_size as u64) as u32;
        pages.max(self.current_page)
    }

    /// Record a completed fetch of `page`. There are more pages iff the page
    /// came back full and the estimate reaches past it. The estimate comes
    /// from an unfiltered count, so this can be wrong either way.
    pub fn record_fetch(&mut self, page: u32, returned: usize, total_estimate: u64) {
        self.current_page = page.max(1);
        self.total_estimate = total_estimate;
        self.has_more_pages = returned == self.page_size
            && (self.current_page as u64) * (self.page_size as u64) < total_estimate;
    }

    /// Returns whether the page changed
    pub fn advance(&mut self) -> bool {
        if !self.has_more_pages {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Returns whether the page changed
    pub fn retreat(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Put the cursor back on `page` without touching the fetch bookkeeping
    pub fn restore(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_pages_when_full_page_and_estimate_beyond() {
        let mut cursor = PagingCursor::new(20);
        cursor.record_fetch(2, 20, 45);
        assert!(cursor.has_more_pages());

        cursor.record_fetch(3, 20, 45);
        assert!(!cursor.has_more_pages());
    }

    #[test]
    fn short_page_means_no_more() {
        let mut cursor = PagingCursor::new(20);
        cursor.record_fetch(1, 19, 1_000);
        assert!(!cursor.has_more_pages());
    }

    #[test]
    fn advance_is_noop_without_more_pages() {
        let mut cursor = PagingCursor::new(20);
        cursor.record_fetch(1, 5, 5);
        assert!(!cursor.advance());
        assert_eq!(cursor.current_page(), 1);
    }

    #[test]
    fn advance_and_retreat() {
        let mut cursor = PagingCursor::new(10);
        cursor.record_fetch(1, 10, 100);
        assert!(cursor.advance());
        assert_eq!(cursor.current_page(), 2);
        assert!(cursor.retreat());
        assert_eq!(cursor.current_page(), 1);
        assert!(!cursor.retreat());
        assert_eq!(cursor.current_page(), 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let mut cursor = PagingCursor::new(20);
        cursor.record_fetch(1, 20, 45);
        assert_eq!(cursor.total_pages(), 3);

        cursor.record_fetch(1, 0, 0);
        assert_eq!(cursor.total_pages(), 1);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut cursor = PagingCursor::new(10);
        cursor.record_fetch(4, 10, 100);
        cursor.reset();
        assert_eq!(cursor, PagingCursor::new(10));
    }

    #[test]
    fn focus_depends_on_direction() {
        assert_eq!(Direction::Forward.focus_index(8), 0);
        assert_eq!(Direction::Backward.focus_index(8), 7);
        assert_eq!(Direction::Backward.focus_index(0), 0);
    }
}
