// src/application/pagination.rs

/// `ceil(total_notes / page_size)`, never less than one page.
pub fn total_pages_for(total_notes: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total_notes.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The current page of the list view. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
}

impl PageCursor {
    pub fn new() -> Self {
        Self { page: 1 }
    }

    /// Start on `page` before the page count is known.
    pub fn starting_at(page: u32) -> Self {
        Self { page: page.max(1) }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Move to `page`, clamped to `[1, total_pages]`.
    pub fn go_to(&mut self, page: u32, total_pages: u32) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next(&mut self, total_pages: u32) {
        self.go_to(self.page.saturating_add(1), total_pages);
    }

    pub fn prev(&mut self, total_pages: u32) {
        self.go_to(self.page.saturating_sub(1), total_pages);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(u32),
    Current(u32),
    Gap,
}

/// Labels for the pagination control: first and last page, `range` pages either
/// side of `current`, and gaps between them.
pub fn page_window(current: u32, total_pages: u32, range: u32) -> Vec<PageLabel> {
    let total = total_pages.max(1);
    let current = current.clamp(1, total);
    let low = current.saturating_sub(range).max(1);
    let high = current.saturating_add(range).min(total);
    let label = |page: u32| {
        if page == current {
            PageLabel::Current(page)
        } else {
            PageLabel::Page(page)
        }
    };

    let mut labels = Vec::new();
    if low > 1 {
        labels.push(label(1));
    }
    if low > 2 {
        labels.push(PageLabel::Gap);
    }
    labels.extend((low..=high).map(label));
    if high + 1 < total {
        labels.push(PageLabel::Gap);
    }
    if high < total {
        labels.push(label(total));
    }
    labels
}
