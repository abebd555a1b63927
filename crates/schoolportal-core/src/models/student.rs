use serde::{Deserialize, Serialize};

use super::flexible_id;

/// Full student profile as returned by `GET /students/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StudentProfile {
    #[serde(deserialize_with = "flexible_id")]
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub aadhar_id: Option<String>,
    /// Date of birth, `YYYY-MM-DD`
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default, deserialize_with = "optional_flexible_id")]
    pub current_school_id: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub enrollment_date: Option<String>,
}

/// Row of the admin students list (`GET /admin/students`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StudentSummary {
    #[serde(deserialize_with = "flexible_id")]
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "optional_flexible_id")]
    pub current_school_id: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
}

impl StudentSummary {
    /// Case-insensitive match on name, or substring match on the id.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query) || self.student_id.to_lowercase().contains(&query)
    }
}

/// One subject result in a given year/semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AcademicRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub record_id: String,
    pub subject: String,
    pub year: i32,
    pub semester: u8,
    pub marks: f64,
    pub grade: String,
}

fn optional_flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "flexible_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, name: &str) -> StudentSummary {
        StudentSummary {
            student_id: id.to_string(),
            name: name.to_string(),
            dob: None,
            current_school_id: None,
            contact_info: None,
        }
    }

    #[test]
    fn test_parse_profile() {
        let json = r#"{
            "student_id": "ST12345",
            "name": "Rahul Kumar",
            "aadhar_id": "9876 5432 1098",
            "dob": "2010-05-15",
            "contact_info": "+91 9876543210",
            "current_school_id": 501,
            "school_name": "PM Shri Mahatma Gandhi Government School",
            "enrollment_date": "2022-06-15"
        }"#;
        let profile: StudentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.student_id, "ST12345");
        assert_eq!(profile.current_school_id.as_deref(), Some("501"));
        assert_eq!(profile.dob.as_deref(), Some("2010-05-15"));
    }

    #[test]
    fn test_parse_profile_minimal() {
        let profile: StudentProfile =
            serde_json::from_str(r#"{"student_id": 7, "name": "Neha Patel"}"#).unwrap();
        assert_eq!(profile.student_id, "7");
        assert!(profile.current_school_id.is_none());
        assert!(profile.school_name.is_none());
    }

    #[test]
    fn test_summary_matches() {
        let s = summary("1003", "Amit Sharma");
        assert!(s.matches("amit"));
        assert!(s.matches("SHARMA"));
        assert!(s.matches("100"));
        assert!(s.matches("  "));
        assert!(!s.matches("priya"));
    }

    #[test]
    fn test_parse_academic_record() {
        let json = r#"{"record_id": 1, "subject": "Mathematics", "year": 2024, "semester": 1, "marks": 85, "grade": "A"}"#;
        let record: AcademicRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_id, "1");
        assert_eq!(record.marks, 85.0);
    }
}
