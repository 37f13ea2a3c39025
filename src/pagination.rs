//! Page and sort handling for the device listing.

use serde::Serialize;
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Fields a listing can be ordered by, named as they appear in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Id,
    Name,
    Brand,
    State,
    CreationTime,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Brand => "brand",
            SortField::State => "state",
            SortField::CreationTime => "creation_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl Sort {
    /// Parse a `field[,direction]` sort parameter.
    ///
    /// Absent or blank input sorts by id ascending. A blank field also falls back
    /// to id. The direction is descending only for `desc` (any case); anything
    /// else, including a missing direction, is ascending.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(Self::default());
        };

        let mut parts = raw.split(',');
        let field = match parts.next().map(str::trim).filter(|f| !f.is_empty()) {
            Some(name) => name.parse::<SortField>().map_err(|_| {
                AppError::BadRequest(format!("Unsupported sort field: {}", name))
            })?,
            None => SortField::Id,
        };
        let direction = match parts.next() {
            Some(d) if d.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        Ok(Self { field, direction })
    }
}

/// A validated page request: zero-based page index, bounded size, sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    /// Build from raw query parameters. Size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn from_params(page: Option<u32>, size: Option<u32>, sort: Option<&str>) -> Result<Self> {
        Ok(Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort: Sort::parse(sort)?,
        })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// One page of results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in this page
    pub content: Vec<T>,
    /// Zero-based page index (as requested)
    pub page: u32,
    /// Page size (after clamping)
    pub size: u32,
    /// Number of items matching the filter across all pages
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, request: &PageRequest) -> Self {
        let size = i64::from(request.size);
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }
}
