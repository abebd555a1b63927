use chrono::NaiveDate;
use serde::Serialize;

use super::{required, Field, ValidationErrors};

/// Transfer certificate application form, as edited by the student.
#[derive(Debug, Clone, Default)]
pub struct TransferCertificateForm {
    pub reason: String,
    pub destination_school: String,
    /// Expected transfer date, `YYYY-MM-DD`
    pub transfer_date: String,
    pub additional_info: String,
    pub parent_consent: bool,
}

/// A validated application, ready for `POST /students/{id}/transfer-certificate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCertificateApplication {
    pub reason: String,
    pub destination_school: String,
    pub transfer_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub parent_consent: bool,
}

impl TransferCertificateForm {
    pub fn validate(&self) -> Result<TransferCertificateApplication, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let reason = required(&self.reason);
        if reason.is_none() {
            errors.add(Field::Reason, "Reason for transfer is required");
        }

        let destination_school = required(&self.destination_school);
        if destination_school.is_none() {
            errors.add(Field::DestinationSchool, "Destination school is required");
        }

        let transfer_date = if self.transfer_date.trim().is_empty() {
            errors.add(Field::TransferDate, "Transfer date is required");
            None
        } else {
            let parsed = NaiveDate::parse_from_str(self.transfer_date.trim(), "%Y-%m-%d").ok();
            if parsed.is_none() {
                errors.add(Field::TransferDate, "Transfer date must be a valid date (YYYY-MM-DD)");
            }
            parsed
        };

        if !self.parent_consent {
            errors.add(Field::ParentConsent, "Parent/Guardian consent is required");
        }

        match (reason, destination_school, transfer_date) {
            (Some(reason), Some(destination_school), Some(transfer_date)) if errors.is_empty() => {
                Ok(TransferCertificateApplication {
                    reason,
                    destination_school,
                    transfer_date,
                    additional_info: required(&self.additional_info),
                    parent_consent: true,
                })
            }
            _ => Err(errors),
        }
    }

    /// Clear the form after a successful submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TransferCertificateForm {
        TransferCertificateForm {
            reason: "Family relocating to Delhi".to_string(),
            destination_school: "Delhi Public School".to_string(),
            transfer_date: "2025-04-01".to_string(),
            additional_info: String::new(),
            parent_consent: true,
        }
    }

    #[test]
    fn test_valid_form() {
        let app = filled().validate().unwrap();
        assert_eq!(app.transfer_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert!(app.additional_info.is_none());
        assert!(app.parent_consent);
    }

    #[test]
    fn test_missing_consent_blocks_submission() {
        let mut form = filled();
        form.parent_consent = false;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::ParentConsent), Some("Parent/Guardian consent is required"));
    }

    #[test]
    fn test_invalid_and_missing_fields() {
        let form = TransferCertificateForm {
            reason: "  ".to_string(),
            destination_school: String::new(),
            transfer_date: "next week".to_string(),
            additional_info: String::new(),
            parent_consent: true,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get(Field::Reason).is_some());
        assert!(errors.get(Field::DestinationSchool).is_some());
        assert_eq!(
            errors.get(Field::TransferDate),
            Some("Transfer date must be a valid date (YYYY-MM-DD)")
        );
    }

    #[test]
    fn test_date_with_trailing_text_rejected() {
        for date in ["2025-04-01 whenever", "2025-04-01T10:00:00Z", "01/04/2025"] {
            let mut form = filled();
            form.transfer_date = date.to_string();
            let errors = form.validate().unwrap_err();
            assert!(errors.get(Field::TransferDate).is_some(), "accepted {}", date);
        }

        let mut form = filled();
        form.transfer_date = " 2025-04-01 ".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_wire_shape() {
        let mut form = filled();
        form.additional_info = "Sibling already enrolled".to_string();
        let json = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(json["destinationSchool"], "Delhi Public School");
        assert_eq!(json["transferDate"], "2025-04-01");
        assert_eq!(json["additionalInfo"], "Sibling already enrolled");
        assert_eq!(json["parentConsent"], true);
    }

    #[test]
    fn test_reset() {
        let mut form = filled();
        form.reset();
        assert!(form.reason.is_empty());
        assert!(!form.parent_consent);
    }
}
