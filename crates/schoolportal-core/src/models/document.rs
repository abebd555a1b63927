use serde::{Deserialize, Serialize};

use super::flexible_id;

/// Document categories accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum DocumentType {
    #[serde(rename = "Aadhar Card")]
    AadharCard,
    #[serde(rename = "Birth Certificate")]
    BirthCertificate,
    #[serde(rename = "Previous School Records")]
    PreviousSchoolRecords,
    #[serde(rename = "Medical Certificate")]
    MedicalCertificate,
    #[serde(rename = "Income Certificate")]
    IncomeCertificate,
    #[serde(rename = "Caste Certificate")]
    CasteCertificate,
    #[serde(rename = "Passport Photo")]
    PassportPhoto,
    #[serde(rename = "Migration Certificate")]
    MigrationCertificate,
    #[serde(rename = "Other")]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::AadharCard,
        DocumentType::BirthCertificate,
        DocumentType::PreviousSchoolRecords,
        DocumentType::MedicalCertificate,
        DocumentType::IncomeCertificate,
        DocumentType::CasteCertificate,
        DocumentType::PassportPhoto,
        DocumentType::MigrationCertificate,
        DocumentType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::AadharCard => "Aadhar Card",
            DocumentType::BirthCertificate => "Birth Certificate",
            DocumentType::PreviousSchoolRecords => "Previous School Records",
            DocumentType::MedicalCertificate => "Medical Certificate",
            DocumentType::IncomeCertificate => "Income Certificate",
            DocumentType::CasteCertificate => "Caste Certificate",
            DocumentType::PassportPhoto => "Passport Photo",
            DocumentType::MigrationCertificate => "Migration Certificate",
            DocumentType::Other => "Other",
        }
    }

    /// Next entry in the selector list (wrapping around)
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous entry in the selector list (wrapping around)
    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// An uploaded document. `document_type` stays a free string because the
/// backend may hold categories older than the current selector list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StudentDocument {
    #[serde(deserialize_with = "flexible_id")]
    pub document_id: String,
    pub document_type: String,
    pub file_name: String,
    #[serde(default)]
    pub upload_date: Option<String>,
}

impl StudentDocument {
    pub fn file_kind(&self) -> FileKind {
        FileKind::from_file_name(&self.file_name)
    }
}

/// Coarse file kind, used for the list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
    Other,
}

impl FileKind {
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        match lower.rsplit_once('.').map(|(_, ext)| ext) {
            Some("pdf") => FileKind::Pdf,
            Some("jpeg") | Some("jpg") | Some("png") | Some("gif") => FileKind::Image,
            _ => FileKind::Other,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Image => "IMG",
            FileKind::Other => "DOC",
        }
    }
}
