//! Client-side form validation.
//!
//! Every form has a raw, editable struct (what the user typed) and a
//! validated output type. The API client only accepts the validated types,
//! so an invalid form can never reach the network.

pub mod decision;
pub mod login;
pub mod transfer;
pub mod upload;

pub use decision::{TcDecision, TcDecisionForm};
pub use login::LoginForm;
pub use transfer::{TransferCertificateApplication, TransferCertificateForm};
pub use upload::{DocumentUpload, DocumentUploadForm, MAX_UPLOAD_BYTES};

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    Role,
    Reason,
    DestinationSchool,
    TransferDate,
    ParentConsent,
    DocumentType,
    File,
    Status,
}

impl Field {
    /// Field name as used in the web portal forms and request bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::Role => "userType",
            Field::Reason => "reason",
            Field::DestinationSchool => "destinationSchool",
            Field::TransferDate => "transferDate",
            Field::ParentConsent => "parentConsent",
            Field::DocumentType => "documentType",
            Field::File => "file",
            Field::Status => "status",
        }
    }
}

/// Per-field validation messages, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Trimmed value, or `None` when blank.
pub(crate) fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::Reason, "Reason for transfer is required");
        errors.add(Field::Reason, "something else");
        errors.add(Field::ParentConsent, "Parent/Guardian consent is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Reason), Some("Reason for transfer is required"));
        assert_eq!(errors.get(Field::File), None);

        let order: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec![Field::Reason, Field::ParentConsent]);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(5), Ok(5));

        let mut errors = ValidationErrors::new();
        errors.add(Field::Status, "Status is required");
        assert!(errors.into_result(5).is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required("  admin1 "), Some("admin1".to_string()));
        assert_eq!(required("   "), None);
    }
}
