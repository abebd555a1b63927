use serde::{Deserialize, Serialize};

use super::flexible_id;

/// Review state of a transfer certificate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum TcStatus {
    Pending,
    Approved,
    Rejected,
}

impl TcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TcStatus::Pending => "pending",
            TcStatus::Approved => "approved",
            TcStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TcStatus::Pending => "Pending",
            TcStatus::Approved => "Approved",
            TcStatus::Rejected => "Rejected",
        }
    }

    /// Only pending requests can still receive a decision.
    pub fn is_pending(&self) -> bool {
        matches!(self, TcStatus::Pending)
    }

    /// Valid outcomes of a review.
    pub fn is_decision(&self) -> bool {
        matches!(self, TcStatus::Approved | TcStatus::Rejected)
    }
}

/// A transfer certificate request, as seen by both the student and the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TransferCertificate {
    #[serde(deserialize_with = "flexible_id")]
    pub tc_id: String,
    #[serde(deserialize_with = "flexible_id")]
    pub student_id: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub application_date: Option<String>,
    pub destination_school: String,
    pub reason: String,
    pub status: TcStatus,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub processed_by: Option<String>,
    #[serde(default)]
    pub processed_date: Option<String>,
}

impl TransferCertificate {
    pub fn student_display(&self) -> String {
        match self.student_name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} ({})", name, self.student_id),
            _ => self.student_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_certificate() {
        let json = r#"{
            "tc_id": 103,
            "student_id": 1003,
            "student_name": "Amit Sharma",
            "application_date": "2025-02-20",
            "destination_school": "Green Valley School",
            "reason": "Moving to different district",
            "status": "approved",
            "comments": "All documents verified. Approved.",
            "processed_by": "admin1",
            "processed_date": "2025-02-25"
        }"#;
        let tc: TransferCertificate = serde_json::from_str(json).unwrap();
        assert_eq!(tc.tc_id, "103");
        assert_eq!(tc.status, TcStatus::Approved);
        assert_eq!(tc.student_display(), "Amit Sharma (1003)");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"tc_id": 1, "student_id": 1, "destination_school": "X", "reason": "Y", "status": "archived"}"#;
        assert!(serde_json::from_str::<TransferCertificate>(json).is_err());
    }

    #[test]
    fn test_status_predicates() {
        assert!(TcStatus::Pending.is_pending());
        assert!(!TcStatus::Pending.is_decision());
        assert!(TcStatus::Approved.is_decision());
        assert!(TcStatus::Rejected.is_decision());
    }
}
