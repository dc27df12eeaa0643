//! Positional field location within a raw CSV line.
//!
//! A line is never split into all of its fields. The locator only isolates
//! field N and hands back the text before and after it untouched, so every
//! byte outside the target field can be reproduced verbatim.

use crate::error::{NormalizerError, Result};
use regex::Regex;

/// One field: a double-quoted run (with `""` escapes) or a run of non-comma
/// characters. An unquoted field cannot start with a quote, otherwise a
/// quoted field could be re-read as several shorter ones.
const FIELD_PATTERN: &str = r#""(?:[^"]|"")*"|(?:[^",][^,]*)?"#;

/// Finds the Nth field (1-based) of a CSV line
#[derive(Debug, Clone)]
pub struct FieldLocator {
    index: usize,
    pattern: Regex,
}

/// A line cut into the text before, at, and after a located field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedField<'a> {
    /// Everything before the field, including its trailing comma
    pub prefix: &'a str,
    /// The field itself, surrounding quotes included
    pub field: &'a str,
    /// Everything after the field, including its leading comma
    pub suffix: &'a str,
}

impl LocatedField<'_> {
    /// Rebuild the line with the field text replaced
    pub fn replace(&self, field: &str) -> String {
        let mut line =
            String::with_capacity(self.prefix.len() + field.len() + self.suffix.len());
        line.push_str(self.prefix);
        line.push_str(field);
        line.push_str(self.suffix);
        line
    }
}

impl FieldLocator {
    /// Compile a locator for a 1-based column index
    pub fn new(index: usize) -> Result<Self> {
        if index == 0 {
            return Err(NormalizerError::configuration(
                "Column indexes are 1-based; 0 is not a valid column",
            ));
        }

        let skipped = index - 1;
        let prefix = if skipped == 0 {
            String::new()
        } else {
            format!("(?:(?:{FIELD_PATTERN}),){{{skipped}}}")
        };
        // The field must end at a comma or the end of the line so a shorter
        // alternative never stops partway through a token.
        let pattern = Regex::new(&format!(
            "^{prefix}(?P<field>{FIELD_PATTERN})(?:,|$)"
        ))?;

        Ok(Self { index, pattern })
    }

    /// The 1-based column this locator targets
    pub fn index(&self) -> usize {
        self.index
    }

    /// Split `line` around the target field, or `None` when the line has fewer fields
    pub fn locate<'a>(&self, line: &'a str) -> Option<LocatedField<'a>> {
        let captures = self.pattern.captures(line)?;
        let field = captures.name("field")?;

        Some(LocatedField {
            prefix: &line[..field.start()],
            field: field.as_str(),
            suffix: &line[field.end()..],
        })
    }
}
