// src/query/paginate.rs

//! Fixed-size page slicing and page navigation state.

use std::fmt;

use serde::Serialize;

use crate::error::{AppError, Result};

/// Recognized page sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [Self::Ten, Self::Twenty, Self::Fifty, Self::Hundred];

    pub fn get(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = AppError;

    fn try_from(size: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.get() == size)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "page size {size} is not one of 10, 20, 50, 100"
                ))
            })
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// One page of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub total_pages: usize,
    /// 1-based position of the first item shown, 0 when the page is empty
    pub first_index: usize,
    /// 1-based position of the last item shown, 0 when the page is empty
    pub last_index: usize,
    pub total: usize,
}

/// Number of pages for `count` records; never less than one.
pub fn total_pages(count: usize, page_size: PageSize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

/// Slice page `current_page` (1-based) out of `records`, clamped to what exists.
pub fn paginate<T>(records: &[T], current_page: usize, page_size: PageSize) -> Page<'_, T> {
    let size = page_size.get();
    let start = current_page.saturating_sub(1).saturating_mul(size).min(records.len());
    let end = start.saturating_add(size).min(records.len());
    let items = &records[start..end];

    let (first_index, last_index) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        items,
        current_page,
        total_pages: total_pages(records.len(), page_size),
        first_index,
        last_index,
        total: records.len(),
    }
}

/// Current page and page size of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: PageSize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl Paginator {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_page: 1,
            page_size,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Move to `page` if it lies within `[1, total_pages(count)]`.
    ///
    /// Out-of-range requests are rejected and leave the state unchanged.
    pub fn go_to(&mut self, page: usize, count: usize) -> Result<()> {
        let last = total_pages(count, self.page_size);
        if page == 0 || page > last {
            return Err(AppError::validation(format!(
                "page {page} is outside 1..={last}"
            )));
        }
        self.current_page = page;
        Ok(())
    }

    pub fn next(&mut self, count: usize) -> Result<()> {
        self.go_to(self.current_page + 1, count)
    }

    pub fn previous(&mut self, count: usize) -> Result<()> {
        self.go_to(self.current_page.saturating_sub(1), count)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Change the page size; a different size restarts at page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        if page_size != self.page_size {
            self.page_size = page_size;
            self.reset();
        }
    }

    pub fn page<'a, T>(&self, records: &'a [T]) -> Page<'a, T> {
        paginate(records, self.current_page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_twenty_five_records_at_ten_per_page() {
        let records = numbers(25);

        let first = paginate(&records, 1, PageSize::Ten);
        assert_eq!(first.items, &records[0..10]);
        assert_eq!(first.total_pages, 3);
        assert_eq!((first.first_index, first.last_index), (1, 10));

        let last = paginate(&records, 3, PageSize::Ten);
        assert_eq!(last.items, &records[20..25]);
        assert_eq!(last.items.first(), Some(&21));
        assert_eq!((last.first_index, last.last_index), (21, 25));
    }

    #[test]
    fn test_pages_cover_every_record() {
        for count in [0, 1, 9, 10, 11, 99, 100, 101, 250] {
            let records = numbers(count);
            for size in PageSize::ALL {
                let pages = total_pages(count, size);
                assert_eq!(pages, count.div_ceil(size.get()).max(1));
                let seen: usize = (1..=pages)
                    .map(|p| paginate(&records, p, size).items.len())
                    .sum();
                assert_eq!(seen, count);
            }
        }
    }

    #[test]
    fn test_empty_set_has_one_empty_page() {
        let records: Vec<usize> = Vec::new();
        let page = paginate(&records, 1, PageSize::Twenty);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!((page.first_index, page.last_index), (0, 0));
    }

    #[test]
    fn test_stale_page_is_clamped() {
        let records = numbers(5);
        assert!(paginate(&records, 4, PageSize::Ten).items.is_empty());
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut paginator = Paginator::default();
        assert!(paginator.go_to(3, 25).is_ok());
        assert_eq!(paginator.current_page(), 3);

        assert!(paginator.go_to(4, 25).is_err());
        assert!(paginator.go_to(0, 25).is_err());
        assert_eq!(paginator.current_page(), 3);

        assert!(paginator.next(25).is_err());
        assert!(paginator.previous(25).is_ok());
        assert_eq!(paginator.current_page(), 2);
    }

    #[test]
    fn test_previous_on_first_page_is_rejected() {
        let mut paginator = Paginator::default();
        assert!(paginator.previous(100).is_err());
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn test_set_page_size_resets() {
        let mut paginator = Paginator::default();
        paginator.go_to(2, 30).unwrap();
        paginator.set_page_size(PageSize::Ten);
        assert_eq!(paginator.current_page(), 2);
        paginator.set_page_size(PageSize::Fifty);
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn test_page_size_try_from() {
        assert_eq!(PageSize::try_from(50).unwrap(), PageSize::Fifty);
        assert!(PageSize::try_from(25).is_err());
    }
}
