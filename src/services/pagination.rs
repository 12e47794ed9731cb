//! Fixed-size page arithmetic shared by the kiosk tables

use std::ops::Range;

/// Current page of a table, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    page: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Move to `page`, clamped into `[1, total_pages]`
    pub fn go_to(&mut self, page: usize, count: usize) -> usize {
        self.page = page.clamp(1, self.total_pages(count).max(1));
        self.page
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Pull the page back when the row set shrank below it
    pub fn clamp(&mut self, count: usize) {
        let last = self.total_pages(count).max(1);
        if self.page > last {
            self.page = last;
        }
    }

    /// Index range of the rows on the current page
    pub fn range(&self, count: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(count);
        let end = (start + self.page_size).min(count);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    /// 1-based row number of the first row on the current page
    pub fn first_row_number(&self) -> usize {
        (self.page - 1) * self.page_size + 1
    }
}
