//! Content readers: turn a file reference into text for the pipeline.
//!
//! Readers are pure I/O: they decode a source per its [`Format`] and return
//! text. Classification, extraction and case bookkeeping live in
//! `TriageProcessor`.

use async_trait::async_trait;

use crate::error::ReadError;
use crate::pipeline::types::Format;

pub mod email_types;
pub mod file;

pub use email_types::{DecodedEmail, decode_email};
pub use file::FsContentReader;

/// Reads document content for a given format.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Reader name for logging.
    fn name(&self) -> &str;

    /// Read and decode `path` as `format`.
    async fn read(&self, path: &str, format: Format) -> Result<String, ReadError>;
}
