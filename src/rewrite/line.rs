//! Line-level application of the configured column rewrites.

use super::date::DateMatcher;
use super::locator::FieldLocator;
use crate::config::NormalizerConfig;
use crate::error::Result;
use crate::models::{ColumnMode, ColumnSpec, LineTransformResult};
use tracing::trace;

/// A compiled column rewrite: where to look and what shape to expect
#[derive(Debug, Clone)]
struct ColumnRewriter {
    locator: FieldLocator,
    mode: ColumnMode,
}

/// Applies every configured date column rewrite to one line.
///
/// Built once per run and reused across every line of every file.
/// With-time columns are applied first in increasing column order,
/// then date-only columns, each against the progressively updated line.
#[derive(Debug, Clone)]
pub struct LineTransformer {
    rewriters: Vec<ColumnRewriter>,
    dates: DateMatcher,
}

impl LineTransformer {
    /// Compile the rewrite table for a set of columns
    pub fn new(columns: &[ColumnSpec]) -> Result<Self> {
        let mut ordered: Vec<ColumnSpec> = columns.to_vec();
        ordered.sort_by_key(|column| (column.mode != ColumnMode::WithTime, column.index));
        ordered.dedup();

        let rewriters = ordered
            .into_iter()
            .map(|column| {
                Ok(ColumnRewriter {
                    locator: FieldLocator::new(column.index)?,
                    mode: column.mode,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rewriters,
            dates: DateMatcher::new()?,
        })
    }

    /// Compile the rewrite table from the configured column groups
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        Self::new(&config.column_specs())
    }

    /// Configured columns in application order
    pub fn columns(&self) -> Vec<ColumnSpec> {
        self.rewriters
            .iter()
            .map(|r| ColumnSpec::new(r.locator.index(), r.mode))
            .collect()
    }

    /// Transform one line. The header line is passed through untouched.
    pub fn transform(&self, line: &str, is_header: bool) -> LineTransformResult {
        if is_header {
            return LineTransformResult {
                text: line.to_string(),
                changed: false,
            };
        }

        let mut text = line.to_string();
        for rewriter in &self.rewriters {
            let Some(located) = rewriter.locator.locate(&text) else {
                continue;
            };
            if let Some(iso) = self.dates.rewrite(located.field, rewriter.mode) {
                trace!(
                    "column {}: '{}' -> '{}'",
                    rewriter.locator.index(),
                    located.field,
                    iso
                );
                text = located.replace(&iso);
            }
        }

        let changed = text != line;
        LineTransformResult { text, changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_transformer() -> LineTransformer {
        LineTransformer::new(&[
            ColumnSpec::new(3, ColumnMode::WithTime),
            ColumnSpec::new(4, ColumnMode::WithTime),
            ColumnSpec::new(11, ColumnMode::DateOnly),
            ColumnSpec::new(13, ColumnMode::DateOnly),
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_line() {
        let transformer = reference_transformer();
        let line = r#"1,2,"25/12/2023 09:00:00",26/12/2023,x,y,z,h,i,j,27/12/2023,k,28/12/2023"#;

        let result = transformer.transform(line, false);

        assert_eq!(
            result.text,
            r#"1,2,"2023-12-25",2023-12-26,x,y,z,h,i,j,2023-12-27,k,2023-12-28"#
        );
        assert!(result.changed);
    }

    #[test]
    fn test_quoted_comma_before_target_column() {
        let transformer = reference_transformer();
        let line = r#""ACME, Ltd",2,25/12/2023 10:00:00,"x, y""#;

        let result = transformer.transform(line, false);

        assert_eq!(result.text, r#""ACME, Ltd",2,2023-12-25,"x, y""#);
        assert!(result.changed);
    }

    #[test]
    fn test_header_is_never_changed() {
        let transformer = LineTransformer::new(&[ColumnSpec::new(1, ColumnMode::DateOnly)])
            .unwrap();

        let result = transformer.transform("25/12/2023,b", true);

        assert_eq!(result.text, "25/12/2023,b");
        assert!(!result.changed);
    }

    #[test]
    fn test_non_date_columns_leave_line_unchanged() {
        let transformer = reference_transformer();
        let line = "a,b,N/A,,e,f,g,h,i,j,pending,l,\"n/a\"";

        let result = transformer.transform(line, false);

        assert_eq!(result.text, line);
        assert!(!result.changed);
    }

    #[test]
    fn test_short_lines_are_left_alone() {
        let transformer = reference_transformer();

        let result = transformer.transform("a,b,25/12/2023", false);

        assert_eq!(result.text, "a,b,2023-12-25");
        assert!(result.changed);
        assert!(!transformer.transform("a,b", false).changed);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let transformer = reference_transformer();
        let line = r#"1,2,"25/12/2023 09:00:00",26/12/2023,x,y,z,h,i,j,27/12/2023,k,28/12/2023"#;

        let once = transformer.transform(line, false);
        let twice = transformer.transform(&once.text, false);

        assert_eq!(twice.text, once.text);
        assert!(!twice.changed);
    }

    #[test]
    fn test_column_mode_shape_is_respected() {
        let transformer = reference_transformer();
        let line = "a,b,c,d,e,f,g,h,i,j,27/12/2023 08:00:00,l,28/12/2023";

        let result = transformer.transform(line, false);

        assert_eq!(result.text, "a,b,c,d,e,f,g,h,i,j,27/12/2023 08:00:00,l,2023-12-28");
    }

    #[test]
    fn test_columns_are_ordered_with_time_first() {
        let transformer = LineTransformer::new(&[
            ColumnSpec::new(13, ColumnMode::DateOnly),
            ColumnSpec::new(4, ColumnMode::WithTime),
            ColumnSpec::new(11, ColumnMode::DateOnly),
            ColumnSpec::new(3, ColumnMode::WithTime),
            ColumnSpec::new(3, ColumnMode::WithTime),
        ])
        .unwrap();

        let order: Vec<usize> = transformer.columns().iter().map(|c| c.index).collect();
        assert_eq!(order, vec![3, 4, 11, 13]);
    }
}
