use super::OutputFormatter;
use crate::domain::Domain;
use crate::lint::LintIssue;
use crate::probe::ProbeReport;
use crate::refresh::RefreshSummary;

pub struct JsonFormatter {
    pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_domains(&self, domains: &[&Domain]) -> String {
        self.to_json(domains)
    }

    fn format_probe(&self, report: &ProbeReport) -> String {
        self.to_json(report)
    }

    fn format_refresh(&self, summary: &RefreshSummary) -> String {
        self.to_json(summary)
    }

    fn format_lint(&self, issues: &[LintIssue]) -> String {
        self.to_json(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scheme;

    #[test]
    fn test_format_domains_array() {
        let mut domain = Domain::new("a.gouv.fr");
        domain.set_status(Scheme::Https, "200 OK".to_string());
        domain.siren = Some("110014016".to_string());

        let text = JsonFormatter::new().compact().format_domains(&[&domain]);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["name"], "a.gouv.fr");
        assert_eq!(parsed[0]["https_status"], "200 OK");
        assert_eq!(parsed[0]["SIREN"], "110014016");
        assert!(parsed[0]["http_status"].is_null());
        // Bookkeeping fields stay out of the payload.
        assert!(parsed[0].get("source_file").is_none());
    }

    #[test]
    fn test_format_refresh() {
        let summary = RefreshSummary {
            checked: 2,
            reachable: 1,
            unreachable: 1,
            interrupted: false,
        };
        let text = JsonFormatter::new().compact().format_refresh(&summary);
        assert_eq!(
            text,
            "{\"checked\":2,\"reachable\":1,\"unreachable\":1,\"interrupted\":false}"
        );
    }
}
