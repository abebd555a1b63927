use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::flexible_id;
use crate::utils::parse_date;

/// A student's participation in a government scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SchemeEnrollment {
    #[serde(deserialize_with = "flexible_id")]
    pub history_id: String,
    pub scheme_name: String,
    pub start_date: String,
    /// `None` means the enrollment is open-ended.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl SchemeEnrollment {
    /// Active when `start <= today` and, if an end date exists, `today <= end`.
    /// An unparseable start date is never active; an unparseable end date is
    /// treated as already ended.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        let Some(start) = parse_date(&self.start_date) else {
            return false;
        };
        if start > today {
            return false;
        }
        match self.end_date.as_deref() {
            None | Some("") => true,
            Some(end) => parse_date(end).map(|end| today <= end).unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(start: &str, end: Option<&str>) -> SchemeEnrollment {
        SchemeEnrollment {
            history_id: "1".to_string(),
            scheme_name: "PM Poshan (Mid-Day Meal)".to_string(),
            start_date: start.to_string(),
            end_date: end.map(|s| s.to_string()),
            benefits: None,
            details: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_open_ended_scheme_is_active_after_start() {
        let s = scheme("2024-06-01", None);
        assert!(s.is_active(date("2025-03-05")));
        assert!(s.is_active(date("2024-06-01")));
        assert!(!s.is_active(date("2024-05-31")));
    }

    #[test]
    fn test_bounded_scheme() {
        let s = scheme("2023-09-01", Some("2024-08-31"));
        assert!(s.is_active(date("2024-08-31")));
        assert!(!s.is_active(date("2025-03-05")));
    }

    #[test]
    fn test_bad_dates_are_inactive() {
        assert!(!scheme("soon", None).is_active(date("2025-03-05")));
        assert!(!scheme("2024-01-01", Some("never")).is_active(date("2025-03-05")));
    }

    #[test]
    fn test_null_end_date_parses() {
        let json = r#"{"history_id": 1, "scheme_name": "PM Poshan", "start_date": "2024-06-01", "end_date": null, "benefits": "Daily nutritious meal"}"#;
        let s: SchemeEnrollment = serde_json::from_str(json).unwrap();
        assert!(s.end_date.is_none());
        assert!(s.details.is_none());
    }
}
