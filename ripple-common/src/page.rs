use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A zero-based page request. Sizes outside `1..=MAX_PAGE_SIZE` fall back to
/// the default / cap so a caller can never request an unbounded page.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, size: Option<u32>) -> Self {
        let size = match size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        };
        Self { page, size }
    }

    #[must_use]
    pub fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn size(self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }

    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, None)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
        }
    }

    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request)
    }
}

#[cfg(test)]
mod tests {
    use crate::page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest};

    #[test]
    fn size_defaults_and_cap() {
        assert_eq!(PageRequest::new(0, None).size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, Some(0)).size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, Some(50)).size(), 50);
        assert_eq!(PageRequest::new(0, Some(10_000)).size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_math() {
        let request = PageRequest::new(3, Some(25));
        assert_eq!(request.limit(), 25);
        assert_eq!(request.offset(), 75);

        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn page_carries_request_shape() {
        let request = PageRequest::new(2, Some(5));
        let page = Page::new(vec![1, 2, 3], request);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.page, 2);
        assert_eq!(page.size, 5);

        assert!(Page::<i32>::empty(request).items.is_empty());
    }
}
