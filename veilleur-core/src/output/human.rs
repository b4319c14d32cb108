use colored::Colorize;

use super::OutputFormatter;
use crate::colors::CatppuccinExt;
use crate::domain::Domain;
use crate::lint::LintIssue;
use crate::probe::ProbeReport;
use crate::refresh::RefreshSummary;

pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn label(&self, text: &str) -> String {
        if self.use_colors {
            text.sky().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_white().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn muted(&self, text: &str) -> String {
        if self.use_colors {
            text.overlay1().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        if self.use_colors {
            format!(
                "\n{}\n{}",
                text.lavender().bold(),
                "─".repeat(text.len()).subtext0()
            )
        } else {
            format!("\n{}\n{}", text, "-".repeat(text.len()))
        }
    }

    /// Color a status message by its rough meaning: 2xx good, 3xx caution,
    /// anything else (including transport failures) bad.
    fn status(&self, status: Option<&str>) -> String {
        let Some(status) = status else {
            return self.muted("(unchecked)");
        };
        let code = status
            .split(' ')
            .next()
            .and_then(|t| t.parse::<u16>().ok());
        match code {
            Some(200..=299) => self.success(status),
            Some(300..=399) => self.warning(status),
            _ => self.error(status),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_domains(&self, domains: &[&Domain]) -> String {
        let mut output = Vec::new();

        for domain in domains {
            output.push(self.header(&domain.name));

            if let Some(ref kind) = domain.kind {
                output.push(format!("  {}: {}", self.label("Type"), self.value(kind)));
            }
            if let Some(ref sources) = domain.sources {
                output.push(format!(
                    "  {}: {}",
                    self.label("Source"),
                    self.value(sources)
                ));
            }
            if let Some(ref siren) = domain.siren {
                output.push(format!("  {}: {}", self.label("SIREN"), self.value(siren)));
            }
            if let Some(ref script) = domain.script {
                output.push(format!(
                    "  {}: {}",
                    self.label("Script"),
                    self.value(script)
                ));
            }
            output.push(format!(
                "  {}: {}",
                self.label(&format!("http://{}", domain.name)),
                self.status(domain.http_status.as_deref())
            ));
            output.push(format!(
                "  {}: {}",
                self.label(&format!("https://{}", domain.name)),
                self.status(domain.https_status.as_deref())
            ));
        }

        if output.is_empty() {
            return format!("{} No matching domain", self.warning("!"));
        }
        output.join("\n")
    }

    fn format_probe(&self, report: &ProbeReport) -> String {
        let mut output = Vec::new();

        output.push(self.header(&format!("Probe: {}", report.name)));
        output.push(format!(
            "  {}: {}",
            self.label(&format!("https://{}", report.name)),
            self.status(Some(&report.https_status))
        ));
        output.push(format!(
            "  {}: {}",
            self.label(&format!("http://{}", report.name)),
            self.status(Some(&report.http_status))
        ));
        output.push(format!(
            "  {}: {}",
            self.label("Duration"),
            self.value(&format!("{}ms", report.duration_ms))
        ));

        output.join("\n")
    }

    fn format_refresh(&self, summary: &RefreshSummary) -> String {
        let mut output = Vec::new();

        output.push(self.header("Refresh summary"));
        output.push(format!(
            "  {}: {}",
            self.label("Checked"),
            self.value(&summary.checked.to_string())
        ));
        output.push(format!(
            "  {}: {}",
            self.label("Reachable"),
            self.success(&summary.reachable.to_string())
        ));
        let unreachable = summary.unreachable.to_string();
        output.push(format!(
            "  {}: {}",
            self.label("Unreachable"),
            if summary.unreachable > 0 {
                self.warning(&unreachable)
            } else {
                self.value(&unreachable)
            }
        ));
        if summary.interrupted {
            output.push(format!(
                "  {} Interrupted, partial results were saved",
                self.warning("!")
            ));
        }

        output.join("\n")
    }

    fn format_lint(&self, issues: &[LintIssue]) -> String {
        if issues.is_empty() {
            return format!("{} No issues found", self.success("✓"));
        }

        let mut output = Vec::new();
        for issue in issues {
            output.push(format!("{} {}", self.error("✗"), issue));
        }
        let count = if issues.len() == 1 {
            "1 issue found".to_string()
        } else {
            format!("{} issues found", issues.len())
        };
        output.push(format!("\n{}", self.warning(&count)));

        output.join("\n")
    }
}
