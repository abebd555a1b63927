use std::path::Path;

use crate::api::MultipartUpload;
use crate::models::DocumentType;

use super::{Field, ValidationErrors};

/// Upload size limit (10 MB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted file extensions and their MIME types
const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("pdf", "application/pdf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

#[derive(Debug, Clone, Default)]
pub struct DocumentUploadForm {
    pub document_type: Option<DocumentType>,
    pub file_path: String,
}

/// A checked, loaded file ready for the multipart upload.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub document_type: DocumentType,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl DocumentUploadForm {
    /// Validate the selection and read the file from disk.
    pub fn prepare(&self) -> Result<DocumentUpload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.document_type.is_none() {
            errors.add(Field::DocumentType, "Please select a document type");
        }

        let path_text = self.file_path.trim();
        let file = if path_text.is_empty() {
            errors.add(Field::File, "Please select a file");
            None
        } else {
            match load_file(Path::new(path_text)) {
                Ok(file) => Some(file),
                Err(message) => {
                    errors.add(Field::File, message);
                    None
                }
            }
        };

        match (self.document_type, file) {
            (Some(document_type), Some((file_name, mime_type, bytes))) if errors.is_empty() => {
                Ok(DocumentUpload {
                    document_type,
                    file_name,
                    mime_type,
                    bytes,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl DocumentUpload {
    pub fn size_kb(&self) -> u64 {
        (self.bytes.len() as u64 + 512) / 1024
    }

    pub(crate) fn into_multipart(self) -> MultipartUpload {
        MultipartUpload {
            fields: vec![(
                "document_type".to_string(),
                self.document_type.label().to_string(),
            )],
            file_field: "file".to_string(),
            file_name: self.file_name,
            mime_type: self.mime_type,
            bytes: self.bytes,
        }
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == ext)
        .map(|(_, mime)| *mime)
}

fn load_file(path: &Path) -> Result<(String, &'static str, Vec<u8>), String> {
    let mime = mime_for(path).ok_or_else(|| "Only PDF, JPG and PNG files are accepted".to_string())?;

    let metadata = std::fs::metadata(path).map_err(|_| "File not found".to_string())?;
    if !metadata.is_file() {
        return Err("Not a regular file".to_string());
    }
    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err("File is larger than 10MB".to_string());
    }
    if metadata.len() == 0 {
        return Err("File is empty".to_string());
    }

    let bytes = std::fs::read(path).map_err(|e| format!("Could not read file: {}", e))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    Ok((file_name, mime, bytes))
}
