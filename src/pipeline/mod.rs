//! Document triage pipeline.
//!
//! Every input flows through:
//! 1. `ContentReader::read()`: format-specific decoding
//! 2. `IntentClassifier::classify()`: keyword rules, structured override for invoices
//! 3. `TextExtractor::extract()` or `extract_structured()`: per-intent fields
//! 4. `CaseStore`: envelope, intent, fields and audit log per thread
//!
//! `TriageProcessor` owns the sequence and contains every failure.

pub mod classifier;
pub mod processor;
pub mod rules;
pub mod structured;
pub mod text;
pub mod types;

pub use classifier::IntentClassifier;
pub use processor::TriageProcessor;
pub use text::TextExtractor;
pub use types::{Format, InputDescriptor, Intent};
