use serde::{Deserialize, Serialize};

/// `limit`/`offset` after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    /// Caps `limit` at `max_limit` and keeps it at least 1.
    pub fn clamped(self, max_limit: u32) -> Self {
        PageRequest {
            limit: self.limit.clamp(1, max_limit.max(1)),
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

/// A page of results. `has_more` is set when the page came back full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub pagination: PageInfo,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: PageRequest) -> Self {
        let count = items.len();
        Paged {
            items,
            count,
            pagination: PageInfo {
                limit: page.limit,
                offset: page.offset,
                has_more: count as u64 == u64::from(page.limit),
            },
        }
    }
}
