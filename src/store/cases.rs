//! In-memory case store keyed by thread id, with an append-only audit log per case.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::pipeline::types::{FieldMap, Format, Intent};

/// Full store content, keyed by thread id in the order threads were first seen.
pub type StoreSnapshot = IndexMap<String, CaseRecord>;

/// Everything known about one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Sender identifier.
    pub source: String,
    /// Detected format. An unsupported format is stored as `None` and exported
    /// as `null`; the raw value is kept in the `Classifier: Detected ...` log entry.
    #[serde(rename = "type")]
    pub format: Option<Format>,
    /// Receipt time.
    pub timestamp: String,
    /// Where the content came from.
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_values: Option<FieldMap>,
    /// Schema fields the structured extractor could not resolve.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<String>,
    /// Audit trail across every processing pass. Only ever appended to.
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Envelope fields set by the router on every pass.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub source: String,
    pub format: Option<Format>,
    pub timestamp: String,
    pub file_path: String,
}

impl CaseRecord {
    fn from_envelope(envelope: Envelope) -> Self {
        Self {
            source: envelope.source,
            format: envelope.format,
            timestamp: envelope.timestamp,
            file_path: envelope.file_path,
            intent: None,
            extracted_values: None,
            anomalies: Vec::new(),
            logs: Vec::new(),
        }
    }
}

/// Shared mapping from thread id to [`CaseRecord`].
///
/// Records are only created through [`CaseStore::open`]; every other mutation
/// fails with [`StoreError::MissingRecord`] for an unknown thread. All writes
/// go through one lock, so log appends keep their order.
#[derive(Debug, Default)]
pub struct CaseStore {
    records: RwLock<StoreSnapshot>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from an exported snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            records: RwLock::new(snapshot),
        }
    }

    /// Create the record for `thread_id` or merge the envelope into it, and
    /// start a new processing pass: intent, extracted values and anomalies
    /// from earlier passes are cleared, the log is kept.
    pub async fn open(&self, thread_id: &str, envelope: Envelope) {
        let mut records = self.records.write().await;
        match records.get_mut(thread_id) {
            Some(record) => {
                record.source = envelope.source;
                record.format = envelope.format;
                record.timestamp = envelope.timestamp;
                record.file_path = envelope.file_path;
                record.intent = None;
                record.extracted_values = None;
                record.anomalies.clear();
                debug!(thread_id, "Reopened case record");
            }
            None => {
                records.insert(thread_id.to_string(), CaseRecord::from_envelope(envelope));
                info!(thread_id, "Created case record");
            }
        }
    }

    /// Append one audit entry.
    pub async fn append_log(
        &self,
        thread_id: &str,
        entry: impl Into<String>,
    ) -> Result<(), StoreError> {
        let entry = entry.into();
        self.update(thread_id, |record| record.logs.push(entry)).await
    }

    /// Record the classified intent.
    pub async fn set_intent(&self, thread_id: &str, intent: Intent) -> Result<(), StoreError> {
        self.update(thread_id, |record| record.intent = Some(intent))
            .await
    }

    /// Record extracted values and anomalies.
    pub async fn set_extraction(
        &self,
        thread_id: &str,
        values: FieldMap,
        anomalies: Vec<String>,
    ) -> Result<(), StoreError> {
        self.update(thread_id, |record| {
            record.extracted_values = Some(values);
            record.anomalies = anomalies;
        })
        .await
    }

    /// Copy of one record.
    pub async fn get(&self, thread_id: &str) -> Option<CaseRecord> {
        self.records.read().await.get(thread_id).cloned()
    }

    /// Copy of the whole store.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn update<F>(&self, thread_id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut CaseRecord),
    {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(thread_id)
            .ok_or_else(|| StoreError::MissingRecord {
                thread_id: thread_id.to_string(),
            })?;
        f(record);
        Ok(())
    }
}
