//! Page slicing for the entity table

use thiserror::Error;

/// Page size outside the supported set
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unsupported page size {0} (expected one of 25, 50, 100, 200)")]
pub struct PageSizeError(pub usize);

/// One of the page sizes the table offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    pub const SUPPORTED: [usize; 4] = [25, 50, 100, 200];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        if Self::SUPPORTED.contains(&size) {
            Ok(Self(size))
        } else {
            Err(PageSizeError(size))
        }
    }
}

/// One page of a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page actually shown
    pub page: usize,
    /// `ceil(total / page_size)`; zero for an empty list
    pub total_pages: usize,
    pub total: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based index of the first item shown, 0 when the page is empty
    pub fn first_index(&self, page_size: PageSize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * page_size.get() + 1
        }
    }
}

/// Slice out the requested page, clamping it into `[1, max(1, total_pages)]`
pub fn paginate<T>(items: &[T], page_size: PageSize, requested_page: usize) -> Page<'_, T> {
    let size = page_size.get();
    let total = items.len();
    let total_pages = total.div_ceil(size);
    let page = requested_page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * size).min(total);
    let end = (start + size).min(total);

    Page {
        items: &items[start..end],
        page,
        total_pages,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::try_from(n).unwrap()
    }

    #[test]
    fn test_supported_sizes() {
        assert_eq!(PageSize::default().get(), 50);
        assert!(PageSize::try_from(100).is_ok());
        assert_eq!(PageSize::try_from(10), Err(PageSizeError(10)));
    }

    #[test]
    fn test_slices_middle_and_last_page() {
        let items: Vec<u32> = (0..120).collect();
        let page = paginate(&items, size(50), 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.first(), Some(&50));
        assert_eq!(page.items.len(), 50);
        assert!(page.has_prev() && page.has_next());

        let last = paginate(&items, size(50), 3);
        assert_eq!(last.items.len(), 20);
        assert!(!last.has_next());
        assert_eq!(last.first_index(size(50)), 101);
    }

    #[test]
    fn test_clamps_out_of_range_requests() {
        let items: Vec<u32> = (0..30).collect();
        assert_eq!(paginate(&items, size(25), 0).page, 1);
        assert_eq!(paginate(&items, size(25), 9).page, 2);
        assert_eq!(paginate(&items, size(25), 9).items.len(), 5);
    }

    #[test]
    fn test_empty_list() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, size(25), 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.first_index(size(25)), 0);
    }

    #[test]
    fn test_effective_page_always_in_bounds() {
        for len in [0usize, 1, 24, 25, 26, 199, 200, 401] {
            let items = vec![(); len];
            for page_size in PageSize::SUPPORTED {
                for requested in 0..12 {
                    let page = paginate(&items, size(page_size), requested);
                    assert!(page.page >= 1);
                    assert!(page.page <= page.total_pages.max(1));
                    assert_eq!(page.total_pages, len.div_ceil(page_size));
                }
            }
        }
    }
}
