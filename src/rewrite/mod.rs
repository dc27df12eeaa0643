//! Column-aware date rewriting.
//!
//! Two independently testable stages: [`locator`] finds field N of a raw
//! line while skipping commas inside quoted fields, and [`date`] decides
//! whether that field is a `DD/MM/YYYY` date and produces its ISO form.
//! [`line`] combines them over the configured column table.

pub mod date;
pub mod line;
pub mod locator;

pub use date::{DateMatcher, DateValue};
pub use line::LineTransformer;
pub use locator::{FieldLocator, LocatedField};
