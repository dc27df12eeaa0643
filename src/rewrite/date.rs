//! Date recognition and ISO rewriting for a single located field.
//!
//! Only the `DD/MM/YYYY` shape is recognized. Digits are copied through
//! as captured; no calendar validation happens here.

use crate::error::Result;
use crate::models::ColumnMode;
use regex::Regex;

/// A date as captured from a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateValue {
    pub day: String,
    pub month: String,
    pub year: String,
    /// Time-of-day suffix exactly as written, leading whitespace included
    pub time: Option<String>,
}

impl DateValue {
    /// `YYYY-MM-DD`; any time suffix is dropped
    pub fn to_iso(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }
}

/// Compiled date shapes, built once and shared by every column
#[derive(Debug, Clone)]
pub struct DateMatcher {
    with_time: Regex,
    date_only: Regex,
    parts: Regex,
}

impl DateMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            with_time: Regex::new(
                r"^[0-9]{2}/[0-9]{2}/[0-9]{4}(?:\s+[0-9]{2}:[0-9]{2}:[0-9]{2})?$",
            )?,
            date_only: Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$")?,
            parts: Regex::new(
                r"^(?P<day>[0-9]{2})/(?P<month>[0-9]{2})/(?P<year>[0-9]{4})(?P<time>.*)$",
            )?,
        })
    }

    /// Whether unquoted field text has the shape expected for `mode`
    pub fn is_match(&self, text: &str, mode: ColumnMode) -> bool {
        match mode {
            ColumnMode::WithTime => self.with_time.is_match(text),
            ColumnMode::DateOnly => self.date_only.is_match(text),
        }
    }

    /// Pull the date parts out of unquoted field text
    pub fn extract(&self, text: &str) -> Option<DateValue> {
        let captures = self.parts.captures(text)?;
        let time = captures
            .name("time")
            .map(|m| m.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Some(DateValue {
            day: captures.name("day")?.as_str().to_string(),
            month: captures.name("month")?.as_str().to_string(),
            year: captures.name("year")?.as_str().to_string(),
            time,
        })
    }

    /// Rewrite a raw field (quotes included) to ISO form.
    ///
    /// Returns `None` when the field is not a date of the expected shape,
    /// in which case the caller keeps the field as it was. A quoted input
    /// yields a quoted output and a bare input a bare output.
    pub fn rewrite(&self, field: &str, mode: ColumnMode) -> Option<String> {
        let (inner, quoted) = unquote(field);
        if !self.is_match(inner, mode) {
            return None;
        }

        let date = self.extract(inner)?;
        let iso = date.to_iso();
        Some(if quoted { format!("\"{iso}\"") } else { iso })
    }
}

/// Strip one pair of surrounding double quotes, reporting whether they were present
fn unquote(field: &str) -> (&str, bool) {
    match field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => (inner, true),
        None => (field, false),
    }
}
