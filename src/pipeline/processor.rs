//! Triage processor: routes one input through read, classify, extract and store.
//!
//! **Core invariant: nothing escapes `process`.** Reader and parser failures
//! abort the single input and land in its audit log; classification and
//! extraction degrade to safe defaults. Every input ends with a best-effort
//! snapshot export.
//!
//! Flow:
//! 1. Open the case record and log the detected format
//! 2. Read content through the `ContentReader`
//! 3. Classify intent (structured signal for JSON, keywords otherwise)
//! 4. Text or structured extraction into the case record

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::channels::ContentReader;
use crate::error::{ExtractionError, PipelineError};
use crate::pipeline::classifier::IntentClassifier;
use crate::pipeline::structured::extract_structured;
use crate::pipeline::text::TextExtractor;
use crate::pipeline::types::{Format, InputDescriptor, Intent};
use crate::store::{CaseStore, Envelope, StoreExporter};

/// Sender recorded when the input names none.
pub const DEFAULT_SENDER: &str = "unknown";

/// Routes inputs through the pipeline and into the shared [`CaseStore`].
pub struct TriageProcessor {
    store: Arc<CaseStore>,
    reader: Arc<dyn ContentReader>,
    exporter: Arc<dyn StoreExporter>,
    classifier: IntentClassifier,
    text_extractor: TextExtractor,
    default_sender: String,
}

impl TriageProcessor {
    /// Processor with the default classifier and field rules.
    pub fn new(
        store: Arc<CaseStore>,
        reader: Arc<dyn ContentReader>,
        exporter: Arc<dyn StoreExporter>,
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            store,
            reader,
            exporter,
            classifier: IntentClassifier::default_rules(),
            text_extractor: TextExtractor::with_default_rules()?,
            default_sender: DEFAULT_SENDER.to_string(),
        })
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_text_extractor(mut self, text_extractor: TextExtractor) -> Self {
        self.text_extractor = text_extractor;
        self
    }

    pub fn with_default_sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = sender.into();
        self
    }

    /// Process one input. Failures are recorded in the case's audit log.
    ///
    /// Returns the thread id the input was filed under.
    pub async fn process(&self, input: InputDescriptor) -> String {
        let thread_id = input
            .thread_id
            .clone()
            .unwrap_or_else(|| format!("thread_{}", Uuid::new_v4().simple()));

        info!(
            thread_id = %thread_id,
            format = %input.format,
            path = %input.file_path,
            "Processing input"
        );

        if let Err(e) = self.run(&thread_id, &input).await {
            error!(thread_id = %thread_id, error = %e, "Input processing aborted");
            if let Err(log_err) = self
                .store
                .append_log(&thread_id, format!("Classifier: Error: {e}"))
                .await
            {
                warn!(thread_id = %thread_id, error = %log_err, "Could not record error");
            }
        }

        self.export(&thread_id).await;
        thread_id
    }

    /// Process inputs one after another. Each input is isolated from the others.
    pub async fn process_batch(&self, inputs: Vec<InputDescriptor>) -> Vec<String> {
        let count = inputs.len();
        info!(count, "Processing input batch");

        let mut thread_ids = Vec::with_capacity(count);
        for input in inputs {
            thread_ids.push(self.process(input).await);
        }

        info!(total = count, "Batch processing complete");
        thread_ids
    }

    async fn run(&self, thread_id: &str, input: &InputDescriptor) -> Result<(), PipelineError> {
        let format = input.format.parse::<Format>().ok();

        // Step 1: case record + envelope
        self.store
            .open(
                thread_id,
                Envelope {
                    source: input
                        .sender
                        .clone()
                        .unwrap_or_else(|| self.default_sender.clone()),
                    format,
                    timestamp: input
                        .timestamp
                        .clone()
                        .unwrap_or_else(|| Utc::now().to_rfc3339()),
                    file_path: input.file_path.clone(),
                },
            )
            .await;
        self.store
            .append_log(
                thread_id,
                format!("Classifier: Detected {} from {}", input.format, input.file_path),
            )
            .await?;

        let Some(format) = format else {
            return Err(PipelineError::UnsupportedFormat(input.format.clone()));
        };

        // Step 2: content
        let content = self.reader.read(&input.file_path, format).await?;
        debug!(
            thread_id,
            reader = self.reader.name(),
            chars = content.len(),
            "Content read"
        );

        // Steps 3-4: classify and extract
        match format {
            Format::Pdf | Format::Email => self.process_text(thread_id, &content, format).await,
            Format::Json => self.process_structured(thread_id, &content).await,
        }
    }

    async fn process_text(
        &self,
        thread_id: &str,
        content: &str,
        format: Format,
    ) -> Result<(), PipelineError> {
        let intent = self.classifier.classify(content, format, None);
        self.record_intent(thread_id, intent).await?;

        let mut values = self.text_extractor.extract(content, intent);
        let sender = self
            .store
            .get(thread_id)
            .await
            .map(|record| record.source)
            .unwrap_or_else(|| self.default_sender.clone());
        values.insert("sender".into(), Value::String(sender));

        info!(thread_id, intent = %intent, "Text fields extracted");
        self.store.set_extraction(thread_id, values, Vec::new()).await?;
        self.store
            .append_log(thread_id, format!("Email Agent: Extracted info for {intent}"))
            .await?;
        Ok(())
    }

    async fn process_structured(&self, thread_id: &str, content: &str) -> Result<(), PipelineError> {
        let data: Value = match serde_json::from_str(content) {
            Ok(data) => data,
            Err(e) => {
                warn!(thread_id, error = %e, "Invalid JSON input");
                return Err(PipelineError::Parse(e.to_string()));
            }
        };

        let intent = self.classifier.classify(content, Format::Json, Some(&data));
        self.record_intent(thread_id, intent).await?;

        let extraction = extract_structured(&data, intent);
        let entry = format!(
            "JSON Agent: Extracted values; Anomalies: [{}]",
            extraction.anomalies.join(", ")
        );
        if !extraction.anomalies.is_empty() {
            warn!(thread_id, anomalies = ?extraction.anomalies, "Structured fields missing");
        }

        self.store
            .set_extraction(thread_id, extraction.fields, extraction.anomalies)
            .await?;
        self.store.append_log(thread_id, entry).await?;
        Ok(())
    }

    async fn record_intent(&self, thread_id: &str, intent: Intent) -> Result<(), PipelineError> {
        self.store.set_intent(thread_id, intent).await?;
        self.store
            .append_log(thread_id, format!("Classifier: Classified intent as {intent}"))
            .await?;
        Ok(())
    }

    async fn export(&self, thread_id: &str) {
        let snapshot = self.store.snapshot().await;
        if let Err(e) = self.exporter.export(&snapshot, thread_id).await {
            error!(thread_id, error = %e, "Failed to export case store");
        }
    }
}
