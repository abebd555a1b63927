//! Utility functions for date parsing and string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_date, format_marks, format_optional, parse_date, truncate_string};
