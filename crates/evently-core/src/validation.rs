//! Input validation for event payloads and query parameters.
//!
//! Each entry point collects every violation before failing so clients see
//! all field errors at once, as `Error::Validation`.

use crate::defaults::*;
use crate::error::{Error, Result};
use crate::models::{
    parse_event_date, CreateEventInput, CreateEventRequest, UpdateEventInput, UpdateEventRequest,
};
use crate::query::{ListEventsParams, ListEventsQuery, SortBy, SortOrder};

/// Length bounds and wording for one text field.
struct TextRule {
    field: &'static str,
    label: &'static str,
    min: usize,
    max: usize,
}

const TITLE: TextRule = TextRule {
    field: "title",
    label: "Title",
    min: TITLE_MIN,
    max: TITLE_MAX,
};
const DESCRIPTION: TextRule = TextRule {
    field: "description",
    label: "Description",
    min: DESCRIPTION_MIN,
    max: DESCRIPTION_MAX,
};
const LOCATION: TextRule = TextRule {
    field: "location",
    label: "Location",
    min: LOCATION_MIN,
    max: LOCATION_MAX,
};
const CATEGORY: TextRule = TextRule {
    field: "category",
    label: "Category",
    min: CATEGORY_MIN,
    max: CATEGORY_MAX,
};

fn check_length(rule: &TextRule, value: &str, errors: &mut Vec<String>) {
    let len = value.chars().count();
    if len < rule.min {
        errors.push(format!(
            "{} must be at least {} characters long",
            rule.label, rule.min
        ));
    } else if len > rule.max {
        errors.push(format!(
            "{} must not exceed {} characters",
            rule.label, rule.max
        ));
    }
}

/// Required text: must be present and non-empty, then within bounds.
fn required_text(rule: &TextRule, value: Option<String>, errors: &mut Vec<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => {
            check_length(rule, &v, errors);
            v
        }
        _ => {
            errors.push(format!("{} should not be empty", rule.field));
            String::new()
        }
    }
}

fn optional_text(
    rule: &TextRule,
    value: Option<String>,
    errors: &mut Vec<String>,
) -> Option<String> {
    if let Some(v) = &value {
        check_length(rule, v, errors);
    }
    value
}

fn check_latitude(value: Option<f64>, errors: &mut Vec<String>) {
    if let Some(lat) = value {
        if !(-90.0..=90.0).contains(&lat) {
            errors.push("Latitude must be between -90 and 90".to_string());
        }
    }
}

fn check_longitude(value: Option<f64>, errors: &mut Vec<String>) {
    if let Some(lon) = value {
        if !(-180.0..=180.0).contains(&lon) {
            errors.push("Longitude must be between -180 and 180".to_string());
        }
    }
}

fn finish<T>(value: T, errors: Vec<String>) -> Result<T> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(Error::Validation(errors))
    }
}

/// Validate a create payload and convert it into a store request.
pub fn validate_create(input: CreateEventInput) -> Result<CreateEventRequest> {
    let mut errors = Vec::new();

    let title = required_text(&TITLE, input.title, &mut errors);
    let description = optional_text(&DESCRIPTION, input.description, &mut errors);
    let date = match input.date.as_deref() {
        Some(raw) if !raw.is_empty() => parse_event_date(raw).map_err(|e| errors.push(e)).ok(),
        _ => {
            errors.push("date should not be empty".to_string());
            None
        }
    };
    let location = required_text(&LOCATION, input.location, &mut errors);
    let category = required_text(&CATEGORY, input.category, &mut errors);
    check_latitude(input.latitude, &mut errors);
    check_longitude(input.longitude, &mut errors);

    match date {
        Some(date) if errors.is_empty() => Ok(CreateEventRequest {
            title,
            description,
            date,
            location,
            category,
            latitude: input.latitude,
            longitude: input.longitude,
        }),
        _ => Err(Error::Validation(errors)),
    }
}

/// Validate a partial-update payload. At least one field must be provided.
pub fn validate_update(input: UpdateEventInput) -> Result<UpdateEventRequest> {
    let mut errors = Vec::new();

    let title = optional_text(&TITLE, input.title, &mut errors);
    let description = optional_text(&DESCRIPTION, input.description, &mut errors);
    let date = input
        .date
        .as_deref()
        .and_then(|raw| parse_event_date(raw).map_err(|e| errors.push(e)).ok());
    let location = optional_text(&LOCATION, input.location, &mut errors);
    let category = optional_text(&CATEGORY, input.category, &mut errors);
    check_latitude(input.latitude, &mut errors);
    check_longitude(input.longitude, &mut errors);

    let req = UpdateEventRequest {
        title,
        description,
        date,
        location,
        category,
        latitude: input.latitude,
        longitude: input.longitude,
    };

    if errors.is_empty() && req.is_empty() {
        errors.push("At least one field must be provided".to_string());
    }

    finish(req, errors)
}

/// Parse an integer query parameter bounded below by 1 and optionally above.
fn bounded_int(
    name: &str,
    raw: Option<&str>,
    default: i64,
    max: Option<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n < 1 => {
            errors.push(format!("{} must not be less than 1", name));
            default
        }
        Ok(n) => match max {
            Some(max) if n > max => {
                errors.push(format!("{} must not be greater than {}", name, max));
                default
            }
            _ => n,
        },
        Err(_) => {
            errors.push(format!("{} must be an integer number", name));
            default
        }
    }
}

/// Validate list query parameters and apply defaults.
pub fn validate_list(params: ListEventsParams) -> Result<ListEventsQuery> {
    let mut errors = Vec::new();

    let sort_by = match params.sort_by.as_deref() {
        None => SortBy::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            errors.push(e);
            SortBy::default()
        }),
    };
    let sort_order = match params.sort_order.as_deref() {
        None => SortOrder::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            errors.push(e);
            SortOrder::default()
        }),
    };
    let page = bounded_int("page", params.page.as_deref(), PAGE, None, &mut errors);
    let limit = bounded_int(
        "limit",
        params.limit.as_deref(),
        PAGE_LIMIT,
        Some(PAGE_LIMIT_MAX),
        &mut errors,
    );

    finish(
        ListEventsQuery {
            search: params.search,
            category: params.category,
            sort_by,
            sort_order,
            page,
            limit,
        },
        errors,
    )
}

/// Validate the `limit` parameter of the similar-events endpoint.
pub fn validate_similar_limit(raw: Option<&str>) -> Result<i64> {
    let mut errors = Vec::new();
    let limit = bounded_int(
        "limit",
        raw,
        SIMILAR_LIMIT,
        Some(SIMILAR_LIMIT_MAX),
        &mut errors,
    );
    finish(limit, errors)
}
