//! Data models for portal entities.
//!
//! This module contains the wire/domain types exchanged with the school
//! management API:
//!
//! - `Role`: the two portal roles (student, admin)
//! - `StudentProfile`, `StudentSummary`: student identity and contact data
//! - `AcademicRecord`: per-subject marks and grades
//! - `StudentDocument`, `DocumentType`: uploaded documents
//! - `TransferCertificate`, `TcStatus`: transfer certificate requests
//! - `SchemeEnrollment`: government scheme participation
//! - `School`: schools known to the admin side

pub mod document;
pub mod role;
pub mod scheme;
pub mod school;
pub mod student;
pub mod transfer;

pub use document::{DocumentType, FileKind, StudentDocument};
pub use role::Role;
pub use scheme::SchemeEnrollment;
pub use school::School;
pub use student::{AcademicRecord, StudentProfile, StudentSummary};
pub use transfer::{TcStatus, TransferCertificate};

use serde::{Deserialize, Deserializer};

/// Identifiers arrive as JSON numbers from some endpoints and as strings
/// ("ST12345") from others. Normalise both to `String`.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Int(n) => Ok(n.to_string()),
        RawId::Text(s) => Ok(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "flexible_id")]
        id: String,
    }

    #[test]
    fn test_flexible_id_accepts_numbers_and_strings() {
        let n: Holder = serde_json::from_str(r#"{"id": 1001}"#).unwrap();
        assert_eq!(n.id, "1001");

        let s: Holder = serde_json::from_str(r#"{"id": "ST12345"}"#).unwrap();
        assert_eq!(s.id, "ST12345");
    }

    #[test]
    fn test_flexible_id_rejects_other_shapes() {
        assert!(serde_json::from_str::<Holder>(r#"{"id": null}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"id": [1]}"#).is_err());
    }
}
