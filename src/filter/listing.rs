use std::fmt;
use std::str::FromStr;

use crate::filter::error::ListError;
use crate::filter::matching::{filter_prefix, Matchable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(ListError::UnknownSortDirection(s.to_string()))
        }
    }
}

/// What the list machinery can reach inside a record: the prefix-match fields
/// from [`Matchable`] plus named sortable fields.
pub trait ListRecord: Matchable {
    /// Field names [`ListQuery::sort`] accepts for this type.
    const SORT_FIELDS: &'static [&'static str];

    /// The value of one sortable field; `None` for names outside `SORT_FIELDS`.
    fn sort_field(&self, field: &str) -> Option<&str>;
}

/// One page of results, borrowed from the source slice.
#[derive(Debug)]
pub struct Page<'a, R> {
    pub items: Vec<&'a R>,
    /// Matches before pagination, for "N results" style display.
    pub total: usize,
    /// Zero-based page index served.
    pub page: usize,
    /// Page count at the requested size; 1 when unpaged.
    pub pages: usize,
}

/// Client-side shaping of a cached list: prefix filter, sort, page.
///
/// Built up field by field, then applied to a slice in one pass. Sorting is
/// case-insensitive and stable, so records with equal keys keep their cache
/// order. A page beyond the end yields an empty page rather than an error.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    query: Option<String>,
    sort: Option<(String, SortDirection)>,
    page: Option<(usize, usize)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = Some(query.into());
        self
    }

    pub fn sort(&mut self, field: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.sort = Some((field.into(), direction));
        self
    }

    pub fn page(&mut self, page: usize, size: usize) -> Result<&mut Self, ListError> {
        if size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        self.page = Some((page, size));
        Ok(self)
    }

    pub fn apply<'a, R: ListRecord>(&self, records: &'a [R]) -> Result<Page<'a, R>, ListError> {
        let mut items: Vec<&R> = match self.query.as_deref() {
            Some(query) => filter_prefix(records, query),
            None => records.iter().collect(),
        };

        if let Some((field, direction)) = &self.sort {
            if !R::SORT_FIELDS.contains(&field.as_str()) {
                return Err(ListError::UnknownSortField {
                    field: field.clone(),
                    allowed: R::SORT_FIELDS.join(", "),
                });
            }
            items.sort_by(|a, b| {
                let left = a.sort_field(field).unwrap_or_default().to_lowercase();
                let right = b.sort_field(field).unwrap_or_default().to_lowercase();
                match direction {
                    SortDirection::Asc => left.cmp(&right),
                    SortDirection::Desc => right.cmp(&left),
                }
            });
        }

        let total = items.len();
        let (page, pages, items) = match self.page {
            Some((page, size)) => {
                let pages = total.div_ceil(size).max(1);
                let start = page.saturating_mul(size).min(total);
                let end = start.saturating_add(size).min(total);
                (page, pages, items[start..end].to_vec())
            }
            None => (0, 1, items),
        };

        Ok(Page { items, total, page, pages })
    }
}
