use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` date, also accepting a full RFC 3339 timestamp or a
/// `YYYY-MM-DD HH:MM:SS` value (only the date part is kept).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .filter(|_| s.len() > 10 && matches!(s.as_bytes()[10], b' ' | b'T'))
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Format a date string to a more readable format ("Mar 05, 2025").
/// Anything that does not parse is returned unchanged.
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => d.format("%b %d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or empty
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format a marks value without a trailing ".0" for whole numbers
pub fn format_marks(marks: f64) -> String {
    if marks.fract() == 0.0 {
        format!("{:.0}", marks)
    } else {
        format!("{:.1}", marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(parse_date("2025-03-05"), expected);
        assert_eq!(parse_date(" 2025-03-05 "), expected);
        assert_eq!(parse_date("2025-03-05 18:38:46"), expected);
        assert_eq!(parse_date("2025-03-05T18:38:46Z"), expected);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("05/03/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-02-10"), "Feb 10, 2025");
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&Some("x".to_string()), "-"), "x");
        assert_eq!(format_optional(&Some("  ".to_string()), "-"), "-");
        assert_eq!(format_optional(&None, "N/A"), "N/A");
    }

    #[test]
    fn test_format_marks() {
        assert_eq!(format_marks(85.0), "85");
        assert_eq!(format_marks(78.5), "78.5");
    }
}
