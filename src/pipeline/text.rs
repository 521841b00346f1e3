//! Field extraction from free text (emails, PDF text).

use serde_json::Value;
use tracing::{info, warn};

use crate::error::ExtractionError;
use crate::pipeline::rules::FieldRules;
use crate::pipeline::types::{FieldMap, Intent, not_available};

/// Default length of the `summary` field and of the fallback mapping.
pub const DEFAULT_SUMMARY_CHARS: usize = 200;

/// Applies intent-specific [`FieldRules`] to text.
pub struct TextExtractor {
    rules: FieldRules,
    summary_chars: usize,
}

impl TextExtractor {
    pub fn new(rules: FieldRules) -> Self {
        Self {
            rules,
            summary_chars: DEFAULT_SUMMARY_CHARS,
        }
    }

    /// Extractor with the default rule tables.
    pub fn with_default_rules() -> Result<Self, ExtractionError> {
        Ok(Self::new(FieldRules::default_rules()?))
    }

    pub fn with_summary_chars(mut self, summary_chars: usize) -> Self {
        self.summary_chars = summary_chars;
        self
    }

    /// Extract fields for `intent`. Never fails: an extraction error degrades
    /// to `{summary, urgency: "normal"}`.
    pub fn extract(&self, text: &str, intent: Intent) -> FieldMap {
        match self.try_extract(text, intent) {
            Ok(fields) => {
                info!(intent = %intent, fields = fields.len(), "Extracted text fields");
                fields
            }
            Err(e) => {
                warn!(intent = %intent, error = %e, "Text extraction failed, using fallback");
                self.fallback(text)
            }
        }
    }

    /// Strict extraction; errors propagate.
    pub fn try_extract(&self, text: &str, intent: Intent) -> Result<FieldMap, ExtractionError> {
        let mut fields = FieldMap::new();
        fields.insert("urgency".into(), Value::String(urgency(text).into()));

        for rule in self.rules.for_intent(intent) {
            let value = rule.apply(text)?.unwrap_or_else(not_available);
            fields.insert(rule.field.clone(), value);
        }

        if matches!(intent, Intent::Regulation | Intent::Other) {
            fields.insert("summary".into(), Value::String(self.summary(text)));
        }

        Ok(fields)
    }

    /// Minimal mapping used when extraction fails.
    pub fn fallback(&self, text: &str) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("summary".into(), Value::String(self.summary(text)));
        fields.insert("urgency".into(), Value::String("normal".into()));
        fields
    }

    fn summary(&self, text: &str) -> String {
        text.chars().take(self.summary_chars).collect()
    }
}

/// `"high"` when the text mentions "urgent" in any case, else `"normal"`.
pub fn urgency(text: &str) -> &'static str {
    if text.to_lowercase().contains("urgent") {
        "high"
    } else {
        "normal"
    }
}
