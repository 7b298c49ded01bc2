/// Offset of the first row of the 1-based `page`, pages below 1 are the first page.
pub fn start_of_page(page: u32, size: u32) -> u64 {
    (page.max(1) as u64 - 1) * size as u64
}

/// One page of a paginated result.
///
/// A query matching nothing still produces a page: `total` is 0 and `items` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    page: u32,
    total: u64,
    items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(page: u32, total: u64, items: Vec<T>) -> Self {
        Self { page, total, items }
    }

    pub fn empty(page: u32) -> Self {
        Self::new(page, 0, Vec::new())
    }

    /// Page number, from 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items on this page.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Number of rows matching the query across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Pages needed to hold `total` rows, `page_size` rows each.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total.div_ceil(page_size as u64)
    }

    pub fn has_content(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
