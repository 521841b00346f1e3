//! Field extraction from structured (JSON) documents.
//!
//! Field sources follow the GST e-invoice layout: `DocDtls` for document
//! details, `ValDtls` for totals and `ItemList` for line items.

use serde_json::Value;
use tracing::info;

use crate::pipeline::types::{FieldMap, Intent, is_not_available, not_available};

/// Currency implied by the presence of a CGST amount.
const GST_CURRENCY: &str = "INR";

/// Fields pulled from a structured document plus the names of the schema
/// fields that resolved to `N/A`, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredExtraction {
    pub fields: FieldMap,
    pub anomalies: Vec<String>,
}

/// Where a schema field takes its value from.
#[derive(Debug, Clone, Copy)]
enum FieldSource {
    /// Nested object keys, e.g. `DocDtls.No`.
    Path(&'static [&'static str]),
    /// A key of the first `ItemList` entry.
    FirstItem(&'static str),
    /// `INR` when the CGST amount is present and truthy.
    GstCurrency,
}

const INVOICE_SCHEMA: &[(&str, FieldSource)] = &[
    ("invoice_number", FieldSource::Path(&["DocDtls", "No"])),
    ("date", FieldSource::Path(&["DocDtls", "Dt"])),
    ("total", FieldSource::Path(&["ValDtls", "TotInvVal"])),
    ("currency", FieldSource::GstCurrency),
];

const RFQ_SCHEMA: &[(&str, FieldSource)] = &[
    ("product", FieldSource::FirstItem("PrdDesc")),
    ("quantity", FieldSource::FirstItem("Qty")),
    ("delivery_date", FieldSource::Path(&["DocDtls", "Dt"])),
];

const COMPLAINT_SCHEMA: &[(&str, FieldSource)] = &[
    ("order_id", FieldSource::Path(&["DocDtls", "No"])),
    ("issue", FieldSource::FirstItem("PrdDesc")),
];

fn schema_for(intent: Intent) -> Option<&'static [(&'static str, FieldSource)]> {
    match intent {
        Intent::Invoice => Some(INVOICE_SCHEMA),
        Intent::Rfq => Some(RFQ_SCHEMA),
        Intent::Complaint => Some(COMPLAINT_SCHEMA),
        Intent::Regulation | Intent::Other => None,
    }
}

/// Extract the schema fields for `intent`.
///
/// An anomaly is any schema field whose value is the `N/A` sentinel. A source
/// value that is literally the string `"N/A"` is therefore reported too, even
/// though its path exists. Intents without a schema pass the whole document
/// through under `data` and report no anomalies.
pub fn extract_structured(data: &Value, intent: Intent) -> StructuredExtraction {
    let Some(schema) = schema_for(intent) else {
        let mut fields = FieldMap::new();
        fields.insert("data".into(), data.clone());
        return StructuredExtraction {
            fields,
            anomalies: Vec::new(),
        };
    };

    let mut fields = FieldMap::new();
    for (name, source) in schema {
        fields.insert((*name).to_string(), resolve(data, *source));
    }

    let anomalies: Vec<String> = fields
        .iter()
        .filter(|(_, v)| is_not_available(v))
        .map(|(k, _)| k.clone())
        .collect();

    info!(
        intent = %intent,
        anomalies = anomalies.len(),
        "Extracted structured fields"
    );

    StructuredExtraction { fields, anomalies }
}

fn resolve(data: &Value, source: FieldSource) -> Value {
    match source {
        FieldSource::Path(path) => lookup(data, path).cloned().unwrap_or_else(not_available),
        FieldSource::FirstItem(key) => first_item(data)
            .and_then(|item| present(item.get(key)))
            .cloned()
            .unwrap_or_else(not_available),
        FieldSource::GstCurrency => {
            if lookup(data, &["ValDtls", "CgstVal"]).is_some_and(is_truthy) {
                Value::String(GST_CURRENCY.into())
            } else {
                not_available()
            }
        }
    }
}

/// Follow object keys; a missing key, non-object step or null leaf is absent.
fn lookup<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let leaf = path
        .iter()
        .try_fold(data, |node, key| node.as_object()?.get(*key))?;
    present(Some(leaf))
}

fn first_item(data: &Value) -> Option<&Value> {
    data.get("ItemList")?.as_array()?.first()
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Truthiness of a JSON value: null, false, zero and empty containers are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
