use serde::Serialize;

use crate::models::{TcStatus, TransferCertificate};

use super::{required, Field, ValidationErrors};

/// Admin review dialog for a single transfer certificate request.
#[derive(Debug, Clone, Default)]
pub struct TcDecisionForm {
    pub status: Option<TcStatus>,
    pub comments: String,
}

/// Body for `PATCH /admin/transfer-certificates/{tcId}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TcDecision {
    pub status: TcStatus,
    pub comments: String,
}

impl TcDecisionForm {
    /// Pre-select a decision, as the Approve/Reject buttons do.
    pub fn with_status(status: TcStatus) -> Self {
        Self {
            status: Some(status),
            comments: String::new(),
        }
    }

    pub fn validate(&self, target: &TransferCertificate) -> Result<TcDecision, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !target.status.is_pending() {
            errors.add(Field::Status, "Only pending applications can be updated");
        }
        let status = match self.status {
            Some(status) if status.is_decision() => Some(status),
            Some(_) => {
                errors.add(Field::Status, "Choose approve or reject");
                None
            }
            None => {
                errors.add(Field::Status, "Status is required");
                None
            }
        };

        match status {
            Some(status) if errors.is_empty() => Ok(TcDecision {
                status,
                comments: required(&self.comments).unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(status: TcStatus) -> TransferCertificate {
        TransferCertificate {
            tc_id: "101".to_string(),
            student_id: "1001".to_string(),
            student_name: Some("Rahul Kumar".to_string()),
            application_date: Some("2025-02-28".to_string()),
            destination_school: "Delhi Public School".to_string(),
            reason: "Family relocating to Delhi".to_string(),
            status,
            comments: None,
            processed_by: None,
            processed_date: None,
        }
    }

    #[test]
    fn test_approve_pending() {
        let mut form = TcDecisionForm::with_status(TcStatus::Approved);
        form.comments = " All documents verified. ".to_string();
        let decision = form.validate(&tc(TcStatus::Pending)).unwrap();
        assert_eq!(decision.status, TcStatus::Approved);
        assert_eq!(decision.comments, "All documents verified.");

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json, serde_json::json!({"status": "approved", "comments": "All documents verified."}));
    }

    #[test]
    fn test_cannot_decide_twice() {
        let form = TcDecisionForm::with_status(TcStatus::Rejected);
        let errors = form.validate(&tc(TcStatus::Approved)).unwrap_err();
        assert_eq!(errors.get(Field::Status), Some("Only pending applications can be updated"));
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let form = TcDecisionForm::with_status(TcStatus::Pending);
        let errors = form.validate(&tc(TcStatus::Pending)).unwrap_err();
        assert_eq!(errors.get(Field::Status), Some("Choose approve or reject"));

        let errors = TcDecisionForm::default().validate(&tc(TcStatus::Pending)).unwrap_err();
        assert_eq!(errors.get(Field::Status), Some("Status is required"));
    }
}
