//! Multipart file upload
//!
//! Uploads are outside the refresh path: one POST, no 401 retry. The
//! multipart body is consumed by the send, so there is nothing to replay.

use std::path::Path;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use topcoin_domain::constants::UPLOAD_FILE_FIELD;
use tracing::{debug, instrument};

use super::client::{bearer, ApiClient};
use super::errors::ApiError;
use super::request::Payload;
use super::response::read_payload;

/// File content to upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Guessed from `file_name` when not given explicitly
    pub mime_type: String,
}

impl UploadFile {
    /// Wrap in-memory content, guessing the MIME type from the file name
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name).first_or_octet_stream().to_string();
        Self { file_name, bytes: bytes.into(), mime_type }
    }

    /// Override the guessed MIME type
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Read a file from disk
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the file cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::InvalidRequest(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file_name =
            path.file_name().and_then(|name| name.to_str()).unwrap_or("file").to_string();

        Ok(Self::from_bytes(file_name, bytes))
    }

    fn into_part(self) -> Result<Part, ApiError> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid MIME type: {}", e)))
    }
}

impl ApiClient {
    /// Upload `file` as `multipart/form-data` together with scalar fields
    ///
    /// The file goes in the `file` field; each entry of `extra_fields` becomes
    /// one text field. The transport sets the multipart `Content-Type`.
    ///
    /// # Errors
    ///
    /// * `ApiError::Request` - any non-2xx response, 401 included
    /// * `ApiError::Transport` - the network call failed
    #[instrument(skip(self, file, extra_fields), fields(file_name = %file.file_name))]
    pub async fn upload<I, K, V>(
        &self,
        path: &str,
        file: UploadFile,
        extra_fields: I,
    ) -> Result<Payload, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Form::new().part(UPLOAD_FILE_FIELD, file.into_part()?);
        for (name, value) in extra_fields {
            form = form.text(name.into(), value.into());
        }

        let url = self.resolve_url(path);
        let mut builder = self.inner.http.request(Method::POST, &url).multipart(form);
        if let Some(token) = self.inner.tokens.access_token() {
            builder = builder.header(AUTHORIZATION, bearer(&token)?);
        }

        let response = self.inner.http.send(builder).await?;
        debug!(status = %response.status(), "upload completed");
        read_payload(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_mime_type_guessed_from_name() {
        let empty = Vec::<u8>::new;

        assert_eq!(UploadFile::from_bytes("passport.png", b"png".to_vec()).mime_type, "image/png");
        assert_eq!(UploadFile::from_bytes("statement.pdf", empty()).mime_type, "application/pdf");
        assert_eq!(UploadFile::from_bytes("blob", empty()).mime_type, "application/octet-stream");

        let overridden = UploadFile::from_bytes("id.bin", empty()).with_mime_type("image/jpeg");
        assert_eq!(overridden.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_from_path_reads_content_and_name() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"jpeg-bytes").unwrap();

        let upload = UploadFile::from_path(file.path()).await.unwrap();
        assert_eq!(upload.bytes, b"jpeg-bytes");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert!(upload.file_name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = UploadFile::from_path("/nonexistent/selfie.png").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
