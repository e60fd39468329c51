//! SQL generation for `EventFilter` and `EventSort`.

use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs};
use sqlx::Postgres;
use uuid::Uuid;

use evently_core::{EventFilter, EventSort, SortDirection, SortField};

use crate::escape_like;

/// Bind parameter for dynamically built event queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Array of UUIDs (for ANY/ALL operations).
    UuidArray(Vec<Uuid>),
    String(String),
    Int(i64),
}

impl QueryParam {
    /// Bind onto an untyped query.
    pub fn bind_to<'q>(
        &self,
        q: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            QueryParam::UuidArray(ids) => q.bind(ids.clone()),
            QueryParam::String(s) => q.bind(s.clone()),
            QueryParam::Int(n) => q.bind(*n),
        }
    }

    /// Bind onto a row-mapped query.
    pub fn bind_to_as<'q, O>(
        &self,
        q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self {
            QueryParam::UuidArray(ids) => q.bind(ids.clone()),
            QueryParam::String(s) => q.bind(s.clone()),
            QueryParam::Int(n) => q.bind(*n),
        }
    }
}

/// Translates an [`EventFilter`] into a parameterized WHERE clause.
///
/// ```rust,ignore
/// let (sql, params) = EventFilterQueryBuilder::new(&filter, 0).build();
/// // sql: "(title ILIKE $1 ESCAPE '\' OR ...) AND category = $2"
/// ```
pub struct EventFilterQueryBuilder<'a> {
    filter: &'a EventFilter,
    param_offset: usize,
}

impl<'a> EventFilterQueryBuilder<'a> {
    /// `param_offset` is the number of parameters already in the query.
    pub fn new(filter: &'a EventFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// WHERE clause fragment and its parameters, in placeholder order.
    /// An empty filter yields `("TRUE", [])`.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        if let Some(search) = &self.filter.search {
            param_idx += 1;
            clauses.push(format!(
                "(title ILIKE ${0} ESCAPE '\\' OR description ILIKE ${0} ESCAPE '\\' OR location ILIKE ${0} ESCAPE '\\')",
                param_idx
            ));
            params.push(QueryParam::String(contains_pattern(search)));
        }

        if let Some(category) = &self.filter.category {
            param_idx += 1;
            clauses.push(format!("category = ${}", param_idx));
            params.push(QueryParam::String(category.clone()));
        }

        if !self.filter.exclude_ids.is_empty() {
            param_idx += 1;
            clauses.push(format!("id <> ALL(${}::uuid[])", param_idx));
            params.push(QueryParam::UuidArray(self.filter.exclude_ids.clone()));
        }

        if let Some(related) = &self.filter.related_to {
            clauses.push(format!(
                "(category = ${} OR location ILIKE ${} ESCAPE '\\')",
                param_idx + 1,
                param_idx + 2
            ));
            param_idx += 2;
            params.push(QueryParam::String(related.category.clone()));
            params.push(QueryParam::String(contains_pattern(
                &related.location_contains,
            )));
        }

        if clauses.is_empty() {
            ("TRUE".to_string(), params)
        } else {
            (clauses.join(" AND "), params)
        }
    }
}

fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like(needle))
}

/// ORDER BY clause (without the keyword) for an [`EventSort`], ending in
/// `id ASC`. Text keys use the "C" collation so ordering is by code point.
pub fn order_by_clause(sort: &EventSort) -> String {
    let mut keys: Vec<String> = sort
        .keys()
        .iter()
        .map(|(field, direction)| {
            let column = match field {
                SortField::Date => "date",
                SortField::Title => "title COLLATE \"C\"",
                SortField::CreatedAt => "created_at",
                SortField::Category => "category COLLATE \"C\"",
                SortField::Location => "location COLLATE \"C\"",
            };
            let dir = match direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("{} {}", column, dir)
        })
        .collect();
    keys.push("id ASC".to_string());
    keys.join(", ")
}
