//! Date helper functions
//!
//! Post dates are written for humans ("January 15, 2024") and parsed back
//! only to order posts.

use chrono::{Datelike, NaiveDate};

/// Format used in front-matter and on pages
pub const DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Parse a display date such as "January 15, 2024".
///
/// Abbreviated month names and ISO dates are accepted as well.
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let formats = [DISPLAY_FORMAT, "%b %d, %Y", "%Y-%m-%d"];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Format a date the way post front-matter writes it.
///
/// The day is not zero-padded: `January 5, 2024`.
pub fn format_display_date(date: &NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), date.day(), date.year())
}
