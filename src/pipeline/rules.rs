//! Declarative field rules for text extraction.
//!
//! Each intent owns an ordered list of [`FieldRule`]s. A rule tries its
//! patterns in order; the first pattern that matches supplies the value,
//! converted by the rule's [`FieldParser`]. A rule with no matching pattern
//! resolves to the `N/A` sentinel.

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::ExtractionError;
use crate::pipeline::types::Intent;

/// How a regex match becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    /// Capture group 1, verbatim.
    Text,
    /// Capture group 1, surrounding whitespace trimmed.
    Trimmed,
    /// The whole match, verbatim.
    WholeMatch,
    /// Capture group 1 as an integer.
    Integer,
    /// Capture group 1 as a floating point number.
    Float,
    /// Keyword in group 1 joined by one space to the phrase in group 2.
    Phrase,
}

impl FieldParser {
    /// Convert the captures of a successful match.
    pub fn parse(&self, field: &str, caps: &Captures<'_>) -> Result<Value, ExtractionError> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

        match self {
            Self::Text => Ok(Value::String(group(1).to_string())),
            Self::Trimmed => Ok(Value::String(group(1).trim().to_string())),
            Self::WholeMatch => Ok(Value::String(group(0).to_string())),
            Self::Integer => {
                let raw = group(1);
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| invalid_number(field, raw))
            }
            Self::Float => {
                let raw = group(1);
                raw.parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| invalid_number(field, raw))
            }
            Self::Phrase => {
                let keyword = group(1);
                let rest = group(2).trim();
                if rest.is_empty() {
                    Ok(Value::String(keyword.to_string()))
                } else {
                    Ok(Value::String(format!("{keyword} {rest}")))
                }
            }
        }
    }
}

fn invalid_number(field: &str, raw: &str) -> ExtractionError {
    ExtractionError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

/// A named field with fallback patterns.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Output field name.
    pub field: String,
    /// Patterns tried in order; first match wins.
    pub patterns: Vec<Regex>,
    /// Conversion of the winning match.
    pub parser: FieldParser,
}

impl FieldRule {
    pub fn new(field: &str, patterns: &[&str], parser: FieldParser) -> Result<Self, ExtractionError> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            field: field.to_string(),
            patterns,
            parser,
        })
    }

    /// Resolve the field against `text`. `Ok(None)` means no pattern matched.
    pub fn apply(&self, text: &str) -> Result<Option<Value>, ExtractionError> {
        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(text) {
                return self.parser.parse(&self.field, &caps).map(Some);
            }
        }
        Ok(None)
    }
}

/// Field rule tables keyed by intent.
#[derive(Debug, Clone)]
pub struct FieldRules {
    rfq: Vec<FieldRule>,
    complaint: Vec<FieldRule>,
    invoice: Vec<FieldRule>,
    generic: Vec<FieldRule>,
}

impl FieldRules {
    /// The default rule tables.
    pub fn default_rules() -> Result<Self, ExtractionError> {
        use FieldParser::*;

        Ok(Self {
            rfq: vec![
                FieldRule::new("quantity", &[r"(?i)(\d+)\s*units?"], Integer)?,
                FieldRule::new("product", &[r"(?i)product\s*(\w+)"], Text)?,
            ],
            complaint: vec![
                FieldRule::new("order_id", &[r"(?i)order\s*#?(\d+)"], Text)?,
                FieldRule::new(
                    "issue",
                    &[r"(?i)(damaged|defective|wrong|issue)[\s,:\-]*([^\n.;]{0,50})"],
                    Phrase,
                )?,
            ],
            invoice: vec![
                FieldRule::new(
                    "invoice_number",
                    &[r"(?i)invoice\s*#?(\w+)", r#"(?i)no['":\s]+([\w/]+)"#],
                    Text,
                )?,
                FieldRule::new(
                    "total",
                    &[r"(?i)total\s*\$?(\d+\.?\d*)", r#"(?i)totinvval['":\s]+(\d+\.?\d*)"#],
                    Float,
                )?,
            ],
            generic: vec![
                FieldRule::new("name", &[r"(?m)^\s*([A-Za-z\s]+)\n"], Trimmed)?,
                FieldRule::new("email", &[r"[\w.\-]+@[\w.\-]+"], WholeMatch)?,
                FieldRule::new("phone", &[r"\+?\d{1,3}[\-.\s]?\d{10}"], WholeMatch)?,
            ],
        })
    }

    /// Rules for an intent. `Regulation` and `Other` share the generic table.
    pub fn for_intent(&self, intent: Intent) -> &[FieldRule] {
        match intent {
            Intent::Rfq => &self.rfq,
            Intent::Complaint => &self.complaint,
            Intent::Invoice => &self.invoice,
            Intent::Regulation | Intent::Other => &self.generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> FieldRules {
        FieldRules::default_rules().unwrap()
    }

    fn rule<'a>(rules: &'a FieldRules, intent: Intent, field: &str) -> &'a FieldRule {
        rules
            .for_intent(intent)
            .iter()
            .find(|r| r.field == field)
            .unwrap()
    }

    #[test]
    fn default_tables_compile() {
        let rules = rules();
        assert_eq!(rules.for_intent(Intent::Rfq).len(), 2);
        assert_eq!(rules.for_intent(Intent::Complaint).len(), 2);
        assert_eq!(rules.for_intent(Intent::Invoice).len(), 2);
        assert_eq!(rules.for_intent(Intent::Other).len(), 3);
        assert_eq!(rules.for_intent(Intent::Regulation).len(), 3);
    }

    #[test]
    fn quantity_parses_integer() {
        let rules = rules();
        let r = rule(&rules, Intent::Rfq, "quantity");
        assert_eq!(r.apply("need 50 Units asap").unwrap(), Some(json!(50)));
        assert_eq!(r.apply("need 7unit").unwrap(), Some(json!(7)));
        assert_eq!(r.apply("no numbers here").unwrap(), None);
    }

    #[test]
    fn quantity_overflow_is_an_error() {
        let rules = rules();
        let r = rule(&rules, Intent::Rfq, "quantity");
        let err = r.apply("99999999999999999999999 units").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidNumber { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn invoice_number_falls_back_to_no_label() {
        let rules = rules();
        let r = rule(&rules, Intent::Invoice, "invoice_number");
        assert_eq!(r.apply("Invoice #A123 attached").unwrap(), Some(json!("A123")));
        assert_eq!(
            r.apply(r#"{"No": "GST/2024/17"}"#).unwrap(),
            Some(json!("GST/2024/17"))
        );
    }

    #[test]
    fn total_falls_back_to_totinvval_label() {
        let rules = rules();
        let r = rule(&rules, Intent::Invoice, "total");
        assert_eq!(r.apply("Total $42.50 due").unwrap(), Some(json!(42.5)));
        assert_eq!(r.apply(r#""TotInvVal": 1180"#).unwrap(), Some(json!(1180.0)));
        assert_eq!(r.apply("nothing owed").unwrap(), None);
    }

    #[test]
    fn issue_phrase_joins_keyword_and_text() {
        let rules = rules();
        let r = rule(&rules, Intent::Complaint, "issue");
        assert_eq!(
            r.apply("arrived damaged, please help").unwrap(),
            Some(json!("damaged please help"))
        );
        assert_eq!(r.apply("it was defective.").unwrap(), Some(json!("defective")));
    }

    #[test]
    fn issue_phrase_is_bounded() {
        let rules = rules();
        let r = rule(&rules, Intent::Complaint, "issue");
        let text = format!("wrong {}", "x".repeat(120));
        let value = r.apply(&text).unwrap().unwrap();
        let phrase = value.as_str().unwrap();
        assert_eq!(phrase.len(), "wrong ".len() + 50);
    }

    #[test]
    fn generic_contact_fields() {
        let rules = rules();
        let text = "Jane Doe\nReach me at jane.doe@example.com or +91 9876543210\n";
        assert_eq!(
            rule(&rules, Intent::Other, "name").apply(text).unwrap(),
            Some(json!("Jane Doe"))
        );
        assert_eq!(
            rule(&rules, Intent::Other, "email").apply(text).unwrap(),
            Some(json!("jane.doe@example.com"))
        );
        assert_eq!(
            rule(&rules, Intent::Other, "phone").apply(text).unwrap(),
            Some(json!("+91 9876543210"))
        );
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = FieldRule::new("broken", &["(unclosed"], FieldParser::Text).unwrap_err();
        assert!(matches!(err, ExtractionError::Pattern(_)));
    }
}
