//! Error types for document triage.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse input manifest {path}: {reason}")]
    Manifest { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a content reader.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Cannot decode {path} as {format}: {reason}")]
    Format {
        path: String,
        format: String,
        reason: String,
    },

    #[error("No text extracted from {path}")]
    EmptyContent { path: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Text extraction failures. Never surfaced past the extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Field {field} has invalid number {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Case store and snapshot export errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No case record for thread {thread_id}")]
    MissingRecord { thread_id: String },

    #[error("Failed to write snapshot to {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort processing of a single input.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Invalid JSON format: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
