//! Page numbering for post listings.
//!
//! Every listing uses [`PAGE_SIZE`]. Requested page numbers never fail: page 0
//! and below select the first page, numbers past the end select the last one.

use serde::Serialize;

/// Posts per listing page.
pub const PAGE_SIZE: u64 = 10;

/// A 1-based page number as requested by a client, possibly out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(i64);

impl PageNumber {
    pub const FIRST: Self = Self(1);

    pub fn new(number: i64) -> Self {
        Self(number)
    }

    /// Read a page number from query-string input.
    ///
    /// Missing or non-numeric input means the first page. Numbers too large
    /// for `i64` saturate, so they end up on the last page.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::FIRST;
        };

        match raw.parse::<i64>() {
            Ok(n) => Self(n),
            Err(_) => {
                let digits = raw.strip_prefix('-').unwrap_or(raw);
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    if raw.starts_with('-') {
                        Self(i64::MIN)
                    } else {
                        Self(i64::MAX)
                    }
                } else {
                    Self::FIRST
                }
            }
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// The slice of a collection a page covers, after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub page_size: u64,
}

impl PageWindow {
    /// Clamp `requested` into `1..=num_pages` for a collection of `total` items.
    ///
    /// An empty collection still has one (empty) page.
    pub fn resolve(requested: PageNumber, total: u64, page_size: u64) -> Self {
        let page_size = page_size.max(1);
        let num_pages = total.div_ceil(page_size).max(1);
        let number = match u64::try_from(requested.get()) {
            Ok(0) | Err(_) => 1,
            Ok(n) => n.min(num_pages),
        };

        Self {
            number,
            num_pages,
            total,
            page_size,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.page_size
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// One page of an ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, items: Vec<T>) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total: window.total,
            page_size: window.page_size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            page_size: self.page_size,
        }
    }
}
