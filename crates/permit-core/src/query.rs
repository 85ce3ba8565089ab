//! Typed parsing of the raw `/v1/permits` query string
//!
//! Every parameter is checked independently and all failures are reported
//! together, so a client fixing a request sees the complete list at once.

use std::collections::HashMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{FieldError, PermitStatus};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 5;
pub const MAX_PER_PAGE: u32 = 5;

lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Validated list query. Built fresh for each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitQuery {
    pub page: u32,
    pub per_page: u32,
    pub submitted_after: Option<NaiveDate>,
    pub submitted_before: Option<NaiveDate>,
    pub status: Option<PermitStatus>,
}

impl Default for PermitQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            submitted_after: None,
            submitted_before: None,
            status: None,
        }
    }
}

impl PermitQuery {
    /// Parse raw query parameters. Keys that are not query fields are ignored.
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut query = PermitQuery::default();

        match parse_page(param(params, "page")) {
            Ok(page) => query.page = page,
            Err(e) => errors.push(e),
        }
        match parse_per_page(param(params, "perPage")) {
            Ok(per_page) => query.per_page = per_page,
            Err(e) => errors.push(e),
        }
        match parse_date("submittedAfter", param(params, "submittedAfter")) {
            Ok(date) => query.submitted_after = date,
            Err(e) => errors.push(e),
        }
        match parse_date("submittedBefore", param(params, "submittedBefore")) {
            Ok(date) => query.submitted_before = date,
            Err(e) => errors.push(e),
        }
        match parse_status(param(params, "status")) {
            Ok(status) => query.status = status,
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(errors)
        }
    }
}

/// Empty values count as absent, so `?page=` falls back to the default.
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_page(raw: Option<&str>) -> Result<u32, FieldError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PAGE);
    };
    match parse_digits(raw) {
        Some(page) if page >= 1 => Ok(page),
        _ => Err(FieldError::new("page", "page must be a positive integer")),
    }
}

/// Unsigned decimal digits only. Values past `u32::MAX` saturate.
fn parse_digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // All-digit input can only fail to parse by overflowing
    Some(raw.parse::<u32>().unwrap_or(u32::MAX))
}

fn parse_per_page(raw: Option<&str>) -> Result<u32, FieldError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PER_PAGE);
    };
    match parse_digits(raw) {
        Some(per_page) if (1..=MAX_PER_PAGE).contains(&per_page) => Ok(per_page),
        _ => Err(FieldError::new(
            "perPage",
            format!("perPage must be an integer between 1 and {}", MAX_PER_PAGE),
        )),
    }
}

/// Strict `YYYY-MM-DD`. The string must also name a real calendar day.
fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, FieldError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if DATE_PATTERN.is_match(raw) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
    }
    Err(FieldError::new(
        field,
        format!("{} must be in YYYY-MM-DD format", field),
    ))
}

fn parse_status(raw: Option<&str>) -> Result<Option<PermitStatus>, FieldError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.parse::<PermitStatus>().map(Some).map_err(|_| {
        let allowed = PermitStatus::ALL
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(" | ");
        FieldError::new(
            "status",
            format!("Invalid status '{}'. Expected {}", raw, allowed),
        )
    })
}
