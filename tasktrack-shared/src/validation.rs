/// Field rules shared by every create/update payload
///
/// Length and email rules are declared with `validator` attributes on the
/// request types; this module holds the custom rules those attributes call
/// into, and flattens `ValidationErrors` into one `{field, message}` entry
/// per violated rule.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::task::{TaskPriority, TaskStatus};

/// Color assigned to projects created without one
pub const DEFAULT_PROJECT_COLOR: &str = "#3B82F6";

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Payload field name
    pub field: String,

    /// Human-readable reason
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation for `field`
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

/// Rejects anything outside the task status enumeration
pub fn validate_task_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TaskStatus>()
        .map(|_| ())
        .map_err(|e| rule_error("status", e.to_string()))
}

/// Rejects anything outside the task priority enumeration
pub fn validate_task_priority(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TaskPriority>()
        .map(|_| ())
        .map_err(|e| rule_error("priority", e.to_string()))
}

/// Rejects due dates that are not ISO-8601 dates or date-times
pub fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    match parse_due_date(value) {
        Some(_) => Ok(()),
        None => Err(rule_error(
            "due_date",
            "Due date must be an ISO-8601 date-time".to_string(),
        )),
    }
}

/// Parses a due date
///
/// Accepts ISO-8601 date-times with `T` or a space between date and time,
/// with or without seconds and with an offset, `Z` or nothing (taken as
/// UTC), plus bare dates (midnight UTC).
pub fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    let normalized = match (value.get(..10), value.get(10..11), value.get(11..)) {
        (Some(date), Some(" "), Some(time)) => format!("{}T{}", date, time),
        _ => value.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z") {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = normalized
        .strip_suffix('Z')
        .or_else(|| normalized.strip_suffix('z'))
        .unwrap_or(&normalized);

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Flattens `validator` output into one entry per violated rule, ordered by
/// field name
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(list) = kind {
            for error in list {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", error.code),
                };
                violations.push(FieldViolation::new(field.to_string(), message));
            }
        }
    }

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}
