use serde::Serialize;

use crate::error::{ServiceError, error_key};

/// Sort direction of one ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

/// Page size limits applied when parsing list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    /// Size used when the request has no `size`.
    pub size: u64,
    /// Larger requested sizes are clamped to this.
    pub max_size: u64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            size: 20,
            max_size: 2000,
        }
    }
}

/// Parameters for list operations: zero-based page index, page size and
/// ordering keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, property: &str, direction: Direction) -> Self {
        self.sort.push(SortOrder {
            property: property.to_string(),
            direction,
        });
        self
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Parse `page`, `size` and repeated `sort` query parameters.
    ///
    /// `sort` takes `prop[,prop...][,asc|desc]`; the direction applies to
    /// every property in the same value. Unknown keys are ignored.
    pub fn from_query(
        pairs: &[(String, String)],
        defaults: &PageDefaults,
        entity: &str,
    ) -> Result<Self, ServiceError> {
        let mut request = PageRequest::new(0, defaults.size);

        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    request.page = value.trim().parse().map_err(|_| {
                        ServiceError::bad_request(
                            entity,
                            error_key::BAD_PAGING,
                            format!("invalid page '{}'", value),
                        )
                    })?;
                }
                "size" => {
                    let size: u64 = value.trim().parse().map_err(|_| {
                        ServiceError::bad_request(
                            entity,
                            error_key::BAD_PAGING,
                            format!("invalid size '{}'", value),
                        )
                    })?;
                    if size == 0 {
                        return Err(ServiceError::bad_request(
                            entity,
                            error_key::BAD_PAGING,
                            "page size must be positive",
                        ));
                    }
                    request.size = size.min(defaults.max_size);
                }
                "sort" => request.sort.extend(parse_sort(value)),
                _ => {}
            }
        }

        Ok(request)
    }
}

fn parse_sort(value: &str) -> Vec<SortOrder> {
    let mut parts: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let direction = match parts.last().and_then(|p| Direction::parse(p)) {
        Some(d) => {
            parts.pop();
            d
        }
        None => Direction::Asc,
    };

    parts
        .into_iter()
        .map(|property| SortOrder {
            property: property.to_string(),
            direction,
        })
        .collect()
}

/// One page of a list operation plus the total row count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }
}
