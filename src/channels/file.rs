//! Filesystem content reader.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::channels::ContentReader;
use crate::channels::email_types::decode_email;
use crate::error::ReadError;
use crate::pipeline::types::Format;

/// Reads documents from local files.
///
/// - `pdf`: text is extracted with `pdf-extract`; a `.txt` path is read as
///   plain text (mock PDFs). No text at all is [`ReadError::EmptyContent`].
/// - `json`: raw UTF-8 text; parsing happens in the pipeline.
/// - `email`: raw UTF-8 text, headers included. Only a MIME-encoded body is
///   decoded, with the header lines kept in front of it.
#[derive(Debug, Default)]
pub struct FsContentReader;

impl FsContentReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentReader for FsContentReader {
    fn name(&self) -> &str {
        "fs"
    }

    async fn read(&self, path: &str, format: Format) -> Result<String, ReadError> {
        let file = Path::new(path);
        if !fs::try_exists(file).await.unwrap_or(false) {
            return Err(ReadError::NotFound { path: path.into() });
        }

        let bytes = fs::read(file).await.map_err(|source| ReadError::Io {
            path: path.into(),
            source,
        })?;
        debug!(path, format = %format, bytes = bytes.len(), "Read source file");

        match format {
            Format::Pdf => read_pdf(path, bytes).await,
            Format::Json => decode_utf8(path, format, bytes),
            Format::Email => {
                let raw = decode_utf8(path, format, bytes)?;
                Ok(match decode_email(&raw) {
                    Some(email) => email.render(),
                    None => raw,
                })
            }
        }
    }
}

async fn read_pdf(path: &str, bytes: Vec<u8>) -> Result<String, ReadError> {
    let is_text_mock = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    let content = if is_text_mock {
        decode_utf8(path, Format::Pdf, bytes)?
    } else {
        let owned_path = path.to_string();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| pdf_error(&owned_path, e.to_string()))?
            .map_err(|e| pdf_error(&owned_path, e.to_string()))?
    };

    if content.trim().is_empty() {
        warn!(path, "PDF yielded no text");
        return Err(ReadError::EmptyContent { path: path.into() });
    }
    Ok(content)
}

fn pdf_error(path: &str, reason: String) -> ReadError {
    ReadError::Format {
        path: path.into(),
        format: Format::Pdf.to_string(),
        reason,
    }
}

fn decode_utf8(path: &str, format: Format, bytes: Vec<u8>) -> Result<String, ReadError> {
    String::from_utf8(bytes).map_err(|e| ReadError::Format {
        path: path.into(),
        format: format.to_string(),
        reason: e.to_string(),
    })
}
