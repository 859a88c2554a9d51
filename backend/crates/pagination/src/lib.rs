//! Offset pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept a one-based `page` and a `limit`, translate them
//! into an SQL `OFFSET`/`LIMIT` pair, and answer with a [`Pagination`]
//! envelope describing the filtered total and the number of pages.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, Pagination};
//!
//! let request = PageRequest::new(2, 20).expect("valid page request");
//! assert_eq!(request.offset(), 20);
//!
//! let envelope = Pagination::for_request(request, 41);
//! assert_eq!(envelope.pages, 3);
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not provide one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while validating a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are one-based.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The limit lies outside `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Largest accepted limit.
        max: u32,
    },
}

/// Validated one-based page request.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when either value is out of range.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination envelope returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Number of rows matching the filter across all pages.
    pub total: u64,
    /// Number of pages needed to cover `total`.
    pub pages: u64,
}

impl Pagination {
    /// Describe the page served for `request` out of `total` matching rows.
    #[must_use]
    pub const fn for_request(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit as u64),
        }
    }
}
