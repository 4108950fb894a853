//! Pagination types shared by the store clients.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum items per page
    pub limit: usize,
    /// Items to skip from the start of the listing
    pub skip: usize,
}

impl PageRequest {
    /// First page with the given size.
    pub fn first(limit: usize) -> Self {
        Self { limit, skip: 0 }
    }

    /// The page after this one.
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            skip: self.skip + self.limit,
        }
    }
}

/// Items returned for a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total items in the listing, when the store reports it
    pub total: Option<usize>,
}

impl<T> Page<T> {
    /// An empty page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Some(0),
        }
    }

    /// Whether another page should be requested after `request`.
    pub fn has_more(&self, request: &PageRequest) -> bool {
        if self.items.len() < request.limit || self.items.is_empty() {
            return false;
        }
        match self.total {
            Some(total) => request.skip + self.items.len() < total,
            None => true,
        }
    }
}
