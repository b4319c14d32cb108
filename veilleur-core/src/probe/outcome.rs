//! Rendering probe results and failures into the short messages recorded
//! in the status table.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("Invalid parenthesized details regex"));

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("Invalid bracketed details regex"));

/// Where a probe walk ended: the last response seen, with its raw
/// `Location` header when one was present.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub status: StatusCode,
    pub location: Option<String>,
}

impl ProbeOutcome {
    /// The status message for the table.
    ///
    /// An unfollowed redirect keeps its raw `Location` value in the message
    /// so a reader can see where the domain wanted to send us.
    pub fn message(&self) -> String {
        let code = self.status.as_u16();
        let reason = self.status.canonical_reason().unwrap_or("");
        match code {
            301 | 302 | 303 | 307 | 308 => {
                let dest = self
                    .location
                    .as_deref()
                    .unwrap_or("(but no Location in headers)");
                format!("{code} {reason} {dest}")
            }
            _ => format!("{code} {reason}").trim_end().to_string(),
        }
    }
}

/// Condense a transport failure into a short stable label, so the table
/// diffs stay readable from one run to the next.
pub(crate) fn classify_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "Timeout".to_string();
    }
    if err.is_builder() {
        return "Invalid URL".to_string();
    }
    // TLS failures surface as connect errors, so check for them first.
    if chain_mentions_certificate(err) {
        return "certificate verify failed".to_string();
    }
    if err.is_connect() {
        return "Cannot connect".to_string();
    }
    root_cause_text(err)
}

fn chain_mentions_certificate(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.to_string().to_lowercase().contains("certificate") {
            return true;
        }
        source = e.source();
    }
    false
}

fn root_cause_text(err: &reqwest::Error) -> String {
    let mut cause: &(dyn std::error::Error + 'static) = err;
    while let Some(source) = cause.source() {
        cause = source;
    }
    strip_details(&cause.to_string())
}

/// Drop the noisy parts of a low-level error text: parenthesized and
/// bracketed segments go, and only the part before the first colon stays.
fn strip_details(text: &str) -> String {
    let text = PARENTHESIZED.replace_all(text, "");
    let text = BRACKETED.replace_all(&text, "");
    text.split(':').next().unwrap_or_default().trim().to_string()
}
