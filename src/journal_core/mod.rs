//! Core journal functionality without I/O operations.
//!
//! This module contains the pure content transformation behind `diary add`:
//! computing today's date stamp and prepending a rendered entry header to the
//! existing document. Nothing here touches the filesystem, so it can be tested
//! without a staging session.

use crate::constants::{ENTRY_SEPARATOR, TEMPLATE_VAR_DATE};
use crate::errors::{AppError, AppResult, TemplateError};
use crate::template;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Outcome of [`compose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    /// The new document content, with the rendered entry in front.
    Added(String),
    /// The document already mentions the date stamp. The caller must not write.
    AlreadyPresent,
}

/// The duplicate guard used by [`compose`]: true if `date_stamp` occurs anywhere
/// in `existing`.
pub fn contains_entry(existing: &str, date_stamp: &str) -> bool {
    existing.contains(date_stamp)
}

/// Prepends a dated entry rendered from `template` to `existing`.
///
/// The duplicate guard is a raw substring search: if `date_stamp` occurs
/// anywhere in `existing` (a heading, or just prose mentioning the date) the
/// result is [`Composition::AlreadyPresent`] and the template is not even parsed.
///
/// Otherwise `template` is rendered with the `Date` variable, followed by a blank
/// line, in front of the existing content.
///
/// # Errors
///
/// Returns a [`TemplateError`] if the template is malformed. No content is
/// produced in that case.
///
/// # Examples
///
/// ```
/// use diary::journal_core::{compose, Composition};
///
/// let out = compose("OLD", "2024-01-01", "# {{Date}}").unwrap();
/// assert_eq!(out, Composition::Added("# 2024-01-01\n\nOLD".to_string()));
///
/// let again = compose("# 2024-01-01\n\nOLD", "2024-01-01", "# {{Date}}").unwrap();
/// assert_eq!(again, Composition::AlreadyPresent);
/// ```
pub fn compose(
    existing: &str,
    date_stamp: &str,
    template: &str,
) -> Result<Composition, TemplateError> {
    if contains_entry(existing, date_stamp) {
        return Ok(Composition::AlreadyPresent);
    }

    let header = template::render(template, &[(TEMPLATE_VAR_DATE, date_stamp)])?;

    let mut content =
        String::with_capacity(header.len() + ENTRY_SEPARATOR.len() + existing.len());
    content.push_str(&header);
    content.push_str(ENTRY_SEPARATOR);
    content.push_str(existing);
    Ok(Composition::Added(content))
}

/// Formats `now` with the strftime pattern from the `DateFormat` setting.
///
/// # Errors
///
/// Returns `AppError::Config` if `format` contains an invalid specifier, since
/// chrono would otherwise panic while displaying it.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use diary::journal_core::date_stamp;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
/// assert_eq!(date_stamp("%Y-%m-%d", &now).unwrap(), "2024-03-05");
/// assert!(date_stamp("%Q", &now).is_err());
/// ```
pub fn date_stamp<Tz>(format: &str, now: &DateTime<Tz>) -> AppResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let items = parse_date_format(format)?;
    Ok(now.format_with_items(items.into_iter()).to_string())
}

/// Parses a strftime pattern, rejecting unknown specifiers.
pub fn parse_date_format(format: &str) -> AppResult<Vec<Item<'_>>> {
    if format.trim().is_empty() {
        return Err(AppError::Config("DateFormat cannot be empty".to_string()));
    }

    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(AppError::Config(format!(
            "Invalid DateFormat '{}'",
            format
        )));
    }
    Ok(items)
}
