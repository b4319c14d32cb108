//! The persisted status table (`domains.csv`).
//!
//! CSV with header `name,http_status,https_status,SIREN,type,sources,script`,
//! LF line endings, rows sorted by [`crate::domain::sort_key`]. Status
//! messages can carry commas (redirect targets), so fields follow the usual
//! quoting rules: a field containing `,`, `"` or a newline is double-quoted
//! with `""` escapes.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::domain::{Domain, Scheme, CSV_HEADERS};
use crate::error::Result;
use crate::probe::ProbeReport;

/// In-memory status table, keyed by domain name.
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    domains: HashMap<String, Domain>,
}

impl DomainTable {
    /// Read a table from disk. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_csv_text(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse CSV content. The header row and rows without a name are skipped;
    /// short rows leave the missing columns unset, extra columns are ignored.
    pub fn from_csv_text(content: &str) -> Self {
        let mut table = Self::default();
        for record in parse_csv_records(content).into_iter().skip(1) {
            let domain = domain_from_record(record);
            if !domain.name.is_empty() {
                table.insert(domain);
            }
        }
        table
    }

    pub fn insert(&mut self, domain: Domain) {
        self.domains.insert(domain.name.clone(), domain);
    }

    pub fn get(&self, name: &str) -> Option<&Domain> {
        self.domains.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.domains.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    /// Rows in table order (registry suffix first).
    pub fn iter_sorted(&self) -> Vec<&Domain> {
        let mut domains: Vec<&Domain> = self.domains.values().collect();
        domains.sort();
        domains
    }

    /// Merge the parsed source files into the table: existing rows keep their
    /// statuses and metadata, new names come in fresh, and rows whose name no
    /// longer appears in any source are dropped.
    pub fn sync_with_sources(&mut self, sources: Vec<Domain>) {
        let names: HashSet<String> = sources.iter().map(|d| d.name.clone()).collect();
        let before = self.domains.len();
        for source in sources {
            self.domains.entry(source.name.clone()).or_insert(source);
        }
        self.domains.retain(|name, _| names.contains(name));
        debug!(
            before = before,
            after = self.domains.len(),
            "synced table with sources"
        );
    }

    /// Record both scheme statuses from a probe report. No-op if the row
    /// vanished from the table in the meantime.
    pub fn apply(&mut self, report: &ProbeReport) {
        if let Some(domain) = self.domains.get_mut(&report.name) {
            domain.set_status(Scheme::Https, report.https_status.clone());
            domain.set_status(Scheme::Http, report.http_status.clone());
        }
    }

    /// Rows whose name matches the regex, in table order.
    pub fn search(&self, pattern: &str) -> Result<Vec<&Domain>> {
        let re = Regex::new(pattern)?;
        let mut matches: Vec<&Domain> = self
            .domains
            .values()
            .filter(|d| re.is_match(&d.name))
            .collect();
        matches.sort();
        Ok(matches)
    }

    pub fn to_csv_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&CSV_HEADERS.join(","));
        out.push('\n');
        for domain in self.iter_sorted() {
            let fields = [
                Some(domain.name.as_str()),
                domain.http_status.as_deref(),
                domain.https_status.as_deref(),
                domain.siren.as_deref(),
                domain.kind.as_deref(),
                domain.sources.as_deref(),
                domain.script.as_deref(),
            ];
            let row: Vec<String> = fields
                .iter()
                .map(|f| escape_csv_field(f.unwrap_or("")))
                .collect();
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_csv_text())?;
        debug!(rows = self.domains.len(), path = %path.display(), "wrote table");
        Ok(())
    }
}

fn domain_from_record(fields: Vec<String>) -> Domain {
    let mut fields = fields.into_iter();
    let mut domain = Domain::new(fields.next().unwrap_or_default());
    domain.http_status = next_field(&mut fields);
    domain.https_status = next_field(&mut fields);
    domain.siren = next_field(&mut fields);
    domain.kind = next_field(&mut fields);
    domain.sources = next_field(&mut fields);
    domain.script = next_field(&mut fields);
    domain
}

fn next_field(fields: &mut impl Iterator<Item = String>) -> Option<String> {
    fields.next().filter(|f| !f.is_empty())
}

fn escape_csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split CSV content into records, honoring quoted fields, `""` escapes and
/// quoted embedded newlines. Blank lines become empty records that the
/// caller drops for lack of a name.
fn parse_csv_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' if field.is_empty() => in_quotes = true,
                ',' => record.push(std::mem::take(&mut field)),
                '\r' => {}
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                _ => field.push(c),
            }
        }
    }
    // Content not ending in a newline still closes its last record.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> DomainTable {
        let mut table = DomainTable::default();
        let mut a = Domain::new("interieur.gouv.fr");
        a.https_status = Some("200 OK".to_string());
        a.kind = Some("Ministère".to_string());
        let mut b = Domain::new("ambert.fr");
        b.http_status = Some("301 Moved Permanently https://www.ambert.fr/, n'insistez pas".to_string());
        table.insert(a);
        table.insert(b);
        table
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_parse_csv_records() {
        let records = parse_csv_records("a,b,c\n\"x,y\",\"he said \"\"no\"\"\",z\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec!["a", "b", "c"]);
        assert_eq!(records[1], vec!["x,y", "he said \"no\"", "z"]);
    }

    #[test]
    fn test_parse_csv_records_quoted_newline() {
        let records = parse_csv_records("one,\"two\nlines\"\nnext,row\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec!["one", "two\nlines"]);
        assert_eq!(records[1], vec!["next", "row"]);
    }

    #[test]
    fn test_roundtrip() {
        let table = sample_table();
        let text = table.to_csv_text();
        let reread = DomainTable::from_csv_text(&text);
        assert_eq!(reread.len(), 2);
        let b = reread.get("ambert.fr").unwrap();
        assert_eq!(
            b.http_status.as_deref(),
            Some("301 Moved Permanently https://www.ambert.fr/, n'insistez pas")
        );
        assert!(b.https_status.is_none());
        // Stable once sorted.
        assert_eq!(reread.to_csv_text(), text);
    }

    #[test]
    fn test_rows_are_sorted_by_reversed_labels() {
        let text = sample_table().to_csv_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name,http_status,https_status,SIREN,type,sources,script");
        // ambert.fr (fr, ambert) sorts before interieur.gouv.fr (fr, gouv, ...).
        assert!(lines[1].starts_with("ambert.fr,"));
        assert!(lines[2].starts_with("interieur.gouv.fr,"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = DomainTable::load(&dir.path().join("nope.csv")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_empty_and_short_rows() {
        let table = DomainTable::from_csv_text("");
        assert!(table.is_empty());

        let table = DomainTable::from_csv_text(
            "name,http_status,https_status,SIREN,type,sources,script\nshort.fr,200 OK\n",
        );
        let d = table.get("short.fr").unwrap();
        assert_eq!(d.http_status.as_deref(), Some("200 OK"));
        assert!(d.script.is_none());
    }

    #[test]
    fn test_sync_with_sources() {
        let mut table = sample_table();
        let sources = vec![
            Domain::new("interieur.gouv.fr"),
            Domain::new("nouvelle.gouv.fr"),
        ];
        table.sync_with_sources(sources);

        // Existing row kept its status, the removed one is gone, the new one is in.
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("interieur.gouv.fr").unwrap().https_status.as_deref(),
            Some("200 OK")
        );
        assert!(table.get("ambert.fr").is_none());
        assert!(table.get("nouvelle.gouv.fr").is_some());
    }

    #[test]
    fn test_apply_report() {
        let mut table = sample_table();
        let report = ProbeReport {
            name: "ambert.fr".to_string(),
            https_status: "200 OK".to_string(),
            http_status: "Timeout".to_string(),
            duration_ms: 12,
        };
        table.apply(&report);
        let d = table.get("ambert.fr").unwrap();
        assert_eq!(d.https_status.as_deref(), Some("200 OK"));
        assert_eq!(d.http_status.as_deref(), Some("Timeout"));

        // Unknown names are ignored.
        let report = ProbeReport {
            name: "gone.fr".to_string(),
            https_status: "200 OK".to_string(),
            http_status: "200 OK".to_string(),
            duration_ms: 1,
        };
        table.apply(&report);
        assert!(table.get("gone.fr").is_none());
    }

    #[test]
    fn test_search() {
        let table = sample_table();
        let hits = table.search("gouv").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "interieur.gouv.fr");
        assert!(table.search("[").is_err());
    }

    #[test]
    fn test_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.csv");
        let table = sample_table();
        table.write(&path).unwrap();
        let reread = DomainTable::load(&path).unwrap();
        assert_eq!(reread.len(), table.len());
    }
}
