//! Document upload endpoint
//!
//! Files go to `POST /uploads` as multipart form data with a `file` part and
//! a `type` part. The backend answers `{type, url}`; when it omits `type`
//! the requested type is kept.

use super::client::{decode, ApiClient};
use super::traits::DocumentUploader;
use crate::domain::{ApiError, DocumentType, IntakeError, Result, UploadedDocument};
use crate::log_upload;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use std::path::Path;

/// File extensions the backend accepts, with their content types
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
];

/// A file ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl DocumentFile {
    /// Wraps in-memory file content
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Upload`] if the extension is not an accepted
    /// document type.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).ok_or_else(|| {
            IntakeError::Upload(format!(
                "Unsupported file type for '{file_name}'. Accepted: pdf, png, jpg, jpeg, webp"
            ))
        })?;

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Reads a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| IntakeError::Upload(format!("Invalid file path: {}", path.display())))?
            .to_string();

        // Check the type before reading a possibly large file
        content_type_for(&file_name).ok_or_else(|| {
            IntakeError::Upload(format!(
                "Unsupported file type for '{file_name}'. Accepted: pdf, png, jpg, jpeg, webp"
            ))
        })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            IntakeError::Upload(format!("Failed to read {}: {e}", path.display()))
        })?;

        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ACCEPTED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "type", default)]
    doc_type: Option<DocumentType>,
    url: String,
}

#[async_trait]
impl DocumentUploader for ApiClient {
    async fn upload(
        &self,
        file: &DocumentFile,
        doc_type: DocumentType,
    ) -> Result<UploadedDocument> {
        log_upload!(file.file_name, doc_type, file.len());
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.content_type)
            .map_err(|e| IntakeError::Upload(format!("Invalid content type: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("type", doc_type.to_string());

        let request = self.request(Method::POST, "/uploads").multipart(form);
        let response = self.send(request).await.map_err(upload_error)?;
        let body: UploadResponse = decode(response).await.map_err(upload_error)?;

        let document = UploadedDocument::new(body.doc_type.unwrap_or(doc_type), body.url);
        tracing::debug!(url = %document.url, "Document stored");
        Ok(document)
    }
}

fn upload_error(error: ApiError) -> IntakeError {
    match error {
        ApiError::AuthExpired => IntakeError::AuthExpired,
        other => IntakeError::Upload(other.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::core::session::SessionContext;
    use mockito::Matcher;
    use std::io::Write;
    use test_case::test_case;

    #[test_case("scan.pdf", Some("application/pdf"))]
    #[test_case("photo.JPG", Some("image/jpeg"))]
    #[test_case("photo.webp", Some("image/webp"))]
    #[test_case("notes.txt", None)]
    #[test_case("no_extension", None)]
    fn test_content_type_for(file_name: &str, expected: Option<&str>) {
        assert_eq!(content_type_for(file_name), expected);
    }

    #[test]
    fn test_unsupported_file_rejected() {
        let err = DocumentFile::new("malware.exe", vec![0x4d, 0x5a]).unwrap_err();
        assert!(matches!(err, IntakeError::Upload(_)));
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();

        let document = DocumentFile::from_path(file.path()).await.unwrap();
        assert_eq!(document.content_type(), "application/pdf");
        assert_eq!(document.len(), 8);
    }

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        let config = ApiConfig {
            base_url: format!("{}/api", server.url()),
            ..Default::default()
        };
        ApiClient::new(&config, SessionContext::anonymous()).unwrap()
    }

    #[tokio::test]
    async fn test_upload_posts_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/uploads")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_body(Matcher::Regex(r#"name="type"\s+REPORT"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type":"REPORT","url":"https://files.example.com/r1.pdf"}"#)
            .create_async()
            .await;

        let file = DocumentFile::new("report.pdf", b"%PDF".to_vec()).unwrap();
        let document = client(&server)
            .upload(&file, DocumentType::Report)
            .await
            .unwrap();

        assert_eq!(document.doc_type, DocumentType::Report);
        assert_eq!(document.url, "https://files.example.com/r1.pdf");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_falls_back_to_requested_type() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/uploads")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"url":"https://files.example.com/id.png"}"#)
            .create_async()
            .await;

        let file = DocumentFile::new("id.png", vec![0x89, 0x50]).unwrap();
        let document = client(&server).upload(&file, DocumentType::Id).await.unwrap();
        assert_eq!(document.doc_type, DocumentType::Id);
    }

    #[tokio::test]
    async fn test_upload_failure_is_upload_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/uploads")
            .with_status(413)
            .with_body(r#"{"message":"File too large"}"#)
            .create_async()
            .await;

        let file = DocumentFile::new("big.pdf", vec![0; 16]).unwrap();
        let err = client(&server)
            .upload(&file, DocumentType::Report)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: File too large");
    }
}
