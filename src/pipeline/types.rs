//! Shared types for the triage pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Placeholder stored for a schema field that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Extracted field name → value, in schema declaration order.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// The `N/A` sentinel as a JSON value.
pub fn not_available() -> serde_json::Value {
    serde_json::Value::String(NOT_AVAILABLE.to_string())
}

/// Whether a value is the `N/A` sentinel.
pub fn is_not_available(value: &serde_json::Value) -> bool {
    value.as_str() == Some(NOT_AVAILABLE)
}

// ── Format ──────────────────────────────────────────────────────────

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Pdf,
    Json,
    Email,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            "email" => Ok(Self::Email),
            other => Err(PipelineError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ── Intent ──────────────────────────────────────────────────────────

/// Coarse classification of a document's purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "RFQ")]
    Rfq,
    Invoice,
    Complaint,
    Regulation,
    Other,
}

impl Intent {
    /// Label used in audit logs and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rfq => "RFQ",
            Self::Invoice => "Invoice",
            Self::Complaint => "Complaint",
            Self::Regulation => "Regulation",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Input descriptor ────────────────────────────────────────────────

/// One inbound document to triage.
///
/// `format` stays a raw string at this boundary so an unknown value can be
/// recorded in the audit log instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub format: String,
    #[serde(alias = "file_path")]
    pub file_path: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default, alias = "thread_id")]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl InputDescriptor {
    pub fn new(format: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            file_path: file_path.into(),
            sender: None,
            thread_id: None,
            timestamp: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_known_values() {
        assert_eq!("pdf".parse::<Format>().unwrap(), Format::Pdf);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("email".parse::<Format>().unwrap(), Format::Email);
    }

    #[test]
    fn format_rejects_unknown_value() {
        let err = "docx".parse::<Format>().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(ref f) if f == "docx"));
        assert_eq!(err.to_string(), "Unsupported format: docx");
    }

    #[test]
    fn intent_serializes_as_label() {
        assert_eq!(serde_json::to_value(Intent::Rfq).unwrap(), "RFQ");
        assert_eq!(serde_json::to_value(Intent::Complaint).unwrap(), "Complaint");
        let parsed: Intent = serde_json::from_str("\"RFQ\"").unwrap();
        assert_eq!(parsed, Intent::Rfq);
    }

    #[test]
    fn sentinel_helpers() {
        assert!(is_not_available(&not_available()));
        assert!(!is_not_available(&serde_json::json!("n/a")));
        assert!(!is_not_available(&serde_json::json!(0)));
    }

    #[test]
    fn descriptor_accepts_both_key_styles() {
        let camel: InputDescriptor = serde_json::from_str(
            r#"{"format": "email", "filePath": "a.txt", "threadId": "t1"}"#,
        )
        .unwrap();
        let snake: InputDescriptor = serde_json::from_str(
            r#"{"format": "email", "file_path": "a.txt", "thread_id": "t1"}"#,
        )
        .unwrap();
        assert_eq!(camel.file_path, snake.file_path);
        assert_eq!(camel.thread_id.as_deref(), Some("t1"));
        assert_eq!(snake.thread_id.as_deref(), Some("t1"));
        assert!(snake.sender.is_none());
    }
}
