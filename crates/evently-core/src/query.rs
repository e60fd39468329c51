//! Query planning for the paginated event list.
//!
//! Translates list parameters (search, category, sort, page, limit) into
//! store filter/sort/pagination values and derives the page count for the
//! response envelope. Range checks happen earlier, in `validation`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::defaults;
use crate::traits::{EventFilter, EventSort, SortDirection, SortField};

/// Sort keys exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Date,
    Title,
    CreatedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Title => "title",
            SortBy::CreatedAt => "createdAt",
        }
    }

    fn field(self) -> SortField {
        match self {
            SortBy::Date => SortField::Date,
            SortBy::Title => SortField::Title,
            SortBy::CreatedAt => SortField::CreatedAt,
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortBy::Date),
            "title" => Ok(SortBy::Title),
            "createdAt" => Ok(SortBy::CreatedAt),
            _ => Err("sortBy must be one of the following values: date, title, createdAt".into()),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    fn direction(self) -> SortDirection {
        match self {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err("sortOrder must be one of the following values: asc, desc".into()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw list parameters exactly as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated list query with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
}

impl Default for ListEventsQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: defaults::PAGE,
            limit: defaults::PAGE_LIMIT,
        }
    }
}

/// Store-level parameters for one page of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan {
    pub filter: EventFilter,
    pub sort: EventSort,
    pub offset: i64,
    pub limit: i64,
    pub page: i64,
}

/// Build the store plan for a list query.
///
/// An empty `search` or `category` string means "no filter".
pub fn plan_list(query: &ListEventsQuery) -> ListPlan {
    let filter = EventFilter {
        search: non_empty(&query.search),
        category: non_empty(&query.category),
        ..Default::default()
    };
    let sort = EventSort::by(query.sort_by.field(), query.sort_order.direction());
    // Pages past the addressable range saturate and read as empty.
    let offset = (query.page - 1).saturating_mul(query.limit);

    debug!(
        subsystem = "core",
        component = "planner",
        op = "plan_list",
        has_search = filter.search.is_some(),
        has_category = filter.category.is_some(),
        sort_by = %query.sort_by,
        sort_order = %query.sort_order,
        offset,
        limit = query.limit,
        "List query planned"
    );

    ListPlan {
        filter,
        sort,
        offset,
        limit: query.limit,
        page: query.page,
    }
}

/// `ceil(total / limit)`, and 0 when there is nothing to page through.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
