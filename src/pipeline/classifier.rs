//! Keyword intent classifier.
//!
//! Rules are evaluated in order over the lower-cased content and the first
//! rule with a matching keyword wins. A structured document whose
//! `DocDtls.Typ` is `"INV"` is an invoice regardless of its keywords.

use serde_json::Value;
use tracing::{debug, info};

use crate::pipeline::types::{Format, Intent};

/// Document type code marking a structured invoice.
const INVOICE_DOC_TYPE: &str = "INV";

/// One keyword rule: any keyword present selects the intent.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl IntentRule {
    fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matched_keyword(&self, content_lower: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| content_lower.contains(k.as_str()))
            .map(String::as_str)
    }
}

/// Ordered keyword classifier.
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    /// Classifier with the default keyword table.
    pub fn default_rules() -> Self {
        Self {
            rules: vec![
                IntentRule::new(Intent::Rfq, &["rfq", "quote"]),
                IntentRule::new(Intent::Invoice, &["invoice", "inv"]),
                IntentRule::new(Intent::Complaint, &["complaint", "issue", "damaged"]),
                IntentRule::new(Intent::Regulation, &["regulation"]),
            ],
        }
    }

    /// Classifier with no keyword rules; everything but structured invoices is `Other`.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a keyword rule after the existing ones.
    pub fn add_rule(&mut self, intent: Intent, keywords: &[&str]) {
        self.rules.push(IntentRule::new(intent, keywords));
    }

    /// Decide a single intent for the content.
    pub fn classify(&self, content: &str, format: Format, structured: Option<&Value>) -> Intent {
        if format == Format::Json
            && let Some(data) = structured
            && is_structured_invoice(data)
        {
            debug!("Structured document type is INV");
            info!(intent = %Intent::Invoice, "Classified intent");
            return Intent::Invoice;
        }

        let content_lower = content.to_lowercase();
        let intent = self
            .rules
            .iter()
            .find_map(|rule| {
                rule.matched_keyword(&content_lower).map(|keyword| {
                    debug!(keyword, intent = %rule.intent, "Content matched intent keyword");
                    rule.intent
                })
            })
            .unwrap_or(Intent::Other);

        info!(intent = %intent, "Classified intent");
        intent
    }
}

fn is_structured_invoice(data: &Value) -> bool {
    data.get("DocDtls")
        .and_then(|d| d.get("Typ"))
        .and_then(Value::as_str)
        == Some(INVOICE_DOC_TYPE)
}
