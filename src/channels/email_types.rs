//! Email decoding: header sniffing and MIME body flattening.
//!
//! Plain RFC 822 files are triaged verbatim. Only bodies that are unreadable
//! as stored (multipart, HTML, base64 or quoted-printable) are decoded, and
//! the header lines are kept in front of the decoded text.

use mail_parser::MessageParser;

/// A MIME email with its body reduced to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEmail {
    /// Header lines as they appear in the file, joined with `\n`.
    pub headers: String,
    /// Plain-text body. HTML parts are converted to text.
    pub body: String,
}

impl DecodedEmail {
    /// Text handed to classification: header lines, blank line, body.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.headers, self.body)
    }
}

/// Whether `raw` opens with an RFC 822 header block carrying `From` or `Subject`.
///
/// Plain message bodies that merely start with `Word:` are not headers.
pub fn looks_like_rfc822(raw: &str) -> bool {
    let mut saw_header = false;
    let mut saw_key_header = false;

    for line in raw.lines() {
        if line.trim().is_empty() {
            break;
        }
        // Folded continuation of the previous header.
        if saw_header && line.starts_with([' ', '\t']) {
            continue;
        }
        let Some((name, _)) = line.split_once(':') else {
            return false;
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
        saw_header = true;
        if name.eq_ignore_ascii_case("from") || name.eq_ignore_ascii_case("subject") {
            saw_key_header = true;
        }
    }

    saw_header && saw_key_header
}

fn header_lines(raw: &str) -> Vec<&str> {
    raw.lines().take_while(|line| !line.trim().is_empty()).collect()
}

/// Whether the body must be MIME-decoded to be read as text.
pub fn needs_mime_decoding(raw: &str) -> bool {
    header_lines(raw).iter().any(|line| {
        let Some((name, value)) = line.split_once(':') else {
            return false;
        };
        let value = value.trim().to_ascii_lowercase();
        if name.eq_ignore_ascii_case("content-type") {
            value.starts_with("multipart/") || value.starts_with("text/html")
        } else if name.eq_ignore_ascii_case("content-transfer-encoding") {
            value == "base64" || value == "quoted-printable"
        } else {
            false
        }
    })
}

/// Decode a MIME message. Returns `None` when `raw` is not a message or its
/// body is already plain text, in which case it should be used as is.
pub fn decode_email(raw: &str) -> Option<DecodedEmail> {
    if !looks_like_rfc822(raw) || !needs_mime_decoding(raw) {
        return None;
    }
    let parsed = MessageParser::default().parse(raw.as_bytes())?;
    let body = parsed
        .body_text(0)
        .map(|text| text.trim_end().to_string())
        .unwrap_or_default();

    Some(DecodedEmail {
        headers: header_lines(raw).join("\n"),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── header detection ────────────────────────────────────────

    #[test]
    fn detects_header_block() {
        let raw = "From: alice@example.com\nSubject: RFQ\n\nBody";
        assert!(looks_like_rfc822(raw));
    }

    #[test]
    fn detects_folded_headers() {
        let raw = "Subject: a very\n long subject\nTo: bob@x.com\n\nBody";
        assert!(looks_like_rfc822(raw));
    }

    #[test]
    fn plain_text_is_not_rfc822() {
        assert!(!looks_like_rfc822("We need 50 units of product ABC, urgent"));
        assert!(!looks_like_rfc822(""));
    }

    #[test]
    fn label_line_without_key_header_is_not_rfc822() {
        assert!(!looks_like_rfc822("Note: ship by Friday\n\nThanks"));
        assert!(!looks_like_rfc822("Order status: delayed\nsee below"));
    }

    // ── MIME detection ──────────────────────────────────────────

    #[test]
    fn plain_message_needs_no_decoding() {
        let raw = "From: jane@acme.io\nSubject: Lunch\nContent-Type: text/plain\n\nSee you Friday";
        assert!(!needs_mime_decoding(raw));
        assert!(decode_email(raw).is_none());
    }

    #[test]
    fn mime_headers_need_decoding() {
        assert!(needs_mime_decoding(
            "Subject: x\nContent-Type: multipart/alternative;\n boundary=\"b1\"\n\n--b1"
        ));
        assert!(needs_mime_decoding("Subject: x\nContent-Type: TEXT/HTML\n\n<p>x</p>"));
        assert!(needs_mime_decoding("Subject: x\nContent-Transfer-Encoding: base64\n\neA=="));
    }

    #[test]
    fn encoding_header_in_body_is_ignored() {
        let raw = "Subject: notes\n\nContent-Transfer-Encoding: base64";
        assert!(!needs_mime_decoding(raw));
    }

    #[test]
    fn plain_text_is_not_decoded() {
        assert!(decode_email("My order #123 arrived damaged, please help").is_none());
    }

    // ── decoding ────────────────────────────────────────────────

    #[test]
    fn base64_body_is_decoded_and_headers_kept() {
        let raw = "From: Jane Smith <jane.smith@example.com>\r\n\
                   Subject: Complaint about order #123\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   VGhlIHBhY2thZ2UgYXJyaXZlZCBkYW1hZ2VkLg==\r\n";
        let email = decode_email(raw).unwrap();
        assert_eq!(email.body, "The package arrived damaged.");
        assert!(email.headers.starts_with("From: Jane Smith <jane.smith@example.com>\n"));

        let text = email.render();
        assert!(text.contains("jane.smith@example.com"));
        assert!(text.contains("Subject: Complaint about order #123\n"));
        assert!(text.ends_with("\n\nThe package arrived damaged."));
    }

    #[test]
    fn multipart_message_uses_text_part() {
        let raw = "From: ops@example.com\r\n\
                   Subject: Quote request\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
                   \r\n\
                   --sep\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   Need 40 units of product Pump.\r\n\
                   --sep\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>Need 40 units of product Pump.</p>\r\n\
                   --sep--\r\n";
        let email = decode_email(raw).unwrap();
        assert!(email.body.contains("Need 40 units of product Pump."));
        assert!(!email.body.contains("--sep"));
        assert!(email.headers.contains("From: ops@example.com"));
    }

    #[test]
    fn html_only_body_is_converted_to_text() {
        let raw = "From: a@example.com\r\n\
                   Subject: Notice\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>New <b>regulation</b> applies</p>\r\n";
        let email = decode_email(raw).unwrap();
        assert!(email.body.contains("regulation"));
        assert!(!email.body.contains("<b>"));
    }
}
