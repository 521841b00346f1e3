//! Configuration types.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::pipeline::processor::DEFAULT_SENDER;
use crate::pipeline::text::DEFAULT_SUMMARY_CHARS;
use crate::pipeline::types::InputDescriptor;

/// Default snapshot file.
pub const DEFAULT_EXPORT_PATH: &str = "memory_log.json";

/// Triage configuration.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Where the case store snapshot is written after each input.
    pub export_path: PathBuf,
    /// JSON manifest listing the inputs to process.
    pub manifest_path: Option<PathBuf>,
    /// Sender recorded when an input names none.
    pub default_sender: String,
    /// Length of the `summary` field in characters.
    pub summary_chars: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            manifest_path: None,
            default_sender: DEFAULT_SENDER.to_string(),
            summary_chars: DEFAULT_SUMMARY_CHARS,
        }
    }
}

impl TriageConfig {
    /// Build from `TRIAGE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let export_path = std::env::var("TRIAGE_EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_path);

        let manifest_path = std::env::var("TRIAGE_INPUTS").ok().map(PathBuf::from);

        let default_sender = std::env::var("TRIAGE_DEFAULT_SENDER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_sender);

        let summary_chars = match std::env::var("TRIAGE_SUMMARY_CHARS") {
            Ok(raw) => parse_summary_chars(&raw)?,
            Err(_) => defaults.summary_chars,
        };

        Ok(Self {
            export_path,
            manifest_path,
            default_sender,
            summary_chars,
        })
    }
}

fn parse_summary_chars(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: "TRIAGE_SUMMARY_CHARS".into(),
            message: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}

/// Load an input manifest: a JSON array of input descriptors.
pub async fn load_manifest(path: &Path) -> Result<Vec<InputDescriptor>, ConfigError> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Manifest {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.export_path, PathBuf::from("memory_log.json"));
        assert!(config.manifest_path.is_none());
        assert_eq!(config.default_sender, "unknown");
        assert_eq!(config.summary_chars, 200);
    }

    #[test]
    fn summary_chars_must_be_positive() {
        assert_eq!(parse_summary_chars(" 120 ").unwrap(), 120);
        assert!(matches!(
            parse_summary_chars("0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(parse_summary_chars("lots").is_err());
    }

    #[tokio::test]
    async fn manifest_loads_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        std::fs::write(
            &path,
            r#"[
                {"format": "email", "file_path": "email_rfq.txt", "sender": "john.doe@example.com", "thread_id": "thread_123"},
                {"format": "json", "filePath": "sales_invoice.json"}
            ]"#,
        )
        .unwrap();

        let inputs = load_manifest(&path).await.unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].thread_id.as_deref(), Some("thread_123"));
        assert_eq!(inputs[1].file_path, "sales_invoice.json");
        assert!(inputs[1].sender.is_none());
    }

    #[tokio::test]
    async fn malformed_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        std::fs::write(&path, "{}").unwrap();
        let err = load_manifest(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Manifest { .. }));
    }
}
