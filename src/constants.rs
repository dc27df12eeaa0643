//! Application constants for the export normalizer
//!
//! Default directories, column layout of the reference deployment,
//! output naming literals, and logging formats.

// =============================================================================
// Directories and File Patterns
// =============================================================================

/// Folder scanned for plant exports
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Folder receiving normalized files for ESKER
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Archive for source files that converted successfully
pub const DEFAULT_PROCESSED_DIR: &str = "processed";

/// Archive for source files that could not be converted
pub const DEFAULT_FAILED_DIR: &str = "failed";

/// One log file per run is written here
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Input files picked up per run
pub const DEFAULT_FILE_PATTERN: &str = "*.csv";

// =============================================================================
// Column Layout
// =============================================================================

/// 1-based columns holding a date with an optional time-of-day suffix
pub const DEFAULT_COLUMNS_WITH_TIME: &[usize] = &[3, 4];

/// 1-based columns holding a bare date
pub const DEFAULT_COLUMNS_DATE_ONLY: &[usize] = &[11, 13];

// =============================================================================
// Output Naming
// =============================================================================

/// Leading literal of every output file name
pub const OUTPUT_NAME_PREFIX: &str = "synthomer";

/// Downstream system literal embedded in output names
pub const OUTPUT_SYSTEM_NAME: &str = "ESKER";

/// Output file extension (without the dot)
pub const OUTPUT_EXTENSION: &str = "csv";

/// Format of the run date used in output names and on the command line
pub const RUN_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Site Detection
// =============================================================================

/// Lines probed (header + data lines) when the filename carries no site code
pub const SITE_PROBE_LINES: usize = 3;

/// Leading tokens of the first data line searched for a site code
pub const SITE_PROBE_TOKENS: usize = 3;

// =============================================================================
// Logging
// =============================================================================

/// Prefix of the per-run log file name
pub const LOG_FILE_PREFIX: &str = "esker_normalizer";

/// Timestamp used inside the per-run log file name
pub const LOG_FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp written at the start of each log line
pub const LOG_LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Exit Codes
// =============================================================================

/// Setup failed before any file was touched
pub const EXIT_SETUP_FAILURE: i32 = 1;

/// Run completed but at least one file failed or was left unresolved
pub const EXIT_FILES_FAILED: i32 = 2;
