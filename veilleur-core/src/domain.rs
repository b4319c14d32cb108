//! The dataset record: one public-sector domain name and what we know
//! about it.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::denylist;

/// Columns of the status table, in order.
pub const CSV_HEADERS: [&str; 7] = [
    "name",
    "http_status",
    "https_status",
    "SIREN",
    "type",
    "sources",
    "script",
];

/// URL scheme a probe targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the dataset.
///
/// `name` is the identity: equality, hashing and the sort order ignore every
/// other field. Status messages look like `"200 OK"`, `"301 Moved Permanently
/// https://other.example/"` or `"Timeout"`; an empty CSV field reads back as
/// `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Domain {
    /// Lowercased domain name, possibly carrying a `:port`.
    pub name: String,
    /// Source file this entry came from. Not a table column.
    #[serde(skip)]
    pub source_file: Option<PathBuf>,
    /// Trailing `# ...` comment from the source line. Not a table column.
    #[serde(skip)]
    pub comment: String,
    /// Last recorded probe message for `http://{name}`.
    pub http_status: Option<String>,
    /// Last recorded probe message for `https://{name}`.
    pub https_status: Option<String>,
    /// SIREN number of the owning organization, when known.
    #[serde(rename = "SIREN")]
    pub siren: Option<String>,
    /// Organization category (commune, EPCI, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Where the entry was collected from.
    pub sources: Option<String>,
    /// Script that collected the entry.
    pub script: Option<String>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse one source line into a record.
    ///
    /// The line may be a bare domain name or a full URL; a trailing `# ...`
    /// comment is kept on the record. A URL pre-seeds the matching scheme
    /// status with `"200 OK"`: somebody saw that URL respond once.
    pub fn from_file_line(file: &Path, line: &str) -> Self {
        let (raw, comment) = match line.split_once('#') {
            Some((raw, comment)) => (raw, comment.trim()),
            None => (line, ""),
        };
        let raw = raw.trim().to_lowercase();

        let mut domain = if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::from_url(&raw)
        } else {
            Self::new(raw)
        };
        domain.source_file = Some(file.to_path_buf());
        domain.comment = comment.to_string();
        domain
    }

    /// Record named by the URL authority, with the scheme's status pre-seeded.
    fn from_url(raw: &str) -> Self {
        let Ok(url) = Url::parse(raw) else {
            // Unparseable URLs keep the raw text; lint and probes flag them.
            return Self::new(raw);
        };
        let name = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => raw.to_string(),
        };
        let mut domain = Self::new(name);
        match url.scheme() {
            "https" => domain.https_status = Some("200 OK".to_string()),
            _ => domain.http_status = Some("200 OK".to_string()),
        }
        domain
    }

    /// Record a probe message for one scheme.
    pub fn set_status(&mut self, scheme: Scheme, status: String) {
        match scheme {
            Scheme::Https => self.https_status = Some(status),
            Scheme::Http => self.http_status = Some(status),
        }
    }

    /// Representation of this domain as a URL, preferring https.
    ///
    /// `None` when neither scheme has a confirmed `"200 "` status.
    pub fn url(&self) -> Option<String> {
        if self.https_status.as_deref().is_some_and(status_is_ok) {
            Some(format!("https://{}", self.name))
        } else if self.http_status.as_deref().is_some_and(status_is_ok) {
            Some(format!("http://{}", self.name))
        } else {
            None
        }
    }

    /// True when the name ends with a known non-public suffix.
    pub fn is_not_public(&self) -> bool {
        denylist::is_non_public(&self.name)
    }
}

/// True for the confirmed-reachable form of a status message: `200` plus
/// its reason text. A bare `"200"` does not count.
pub fn status_is_ok(status: &str) -> bool {
    status.starts_with("200 ")
}

/// Sort key grouping names by registry suffix: labels reversed, so
/// `a.gouv.fr` sorts under `["fr", "gouv", "a"]`.
pub fn sort_key(name: &str) -> Vec<&str> {
    name.split('.').rev().collect()
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Domain {}

impl Hash for Domain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// Consistent with Eq: the reversed label sequence determines the name.
impl Ord for Domain {
    fn cmp(&self, other: &Self) -> Ordering {
        sort_key(&self.name).cmp(&sort_key(&other.name))
    }
}

impl PartialOrd for Domain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comment.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}  # {}", self.name, self.comment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_line_plain() {
        let d = Domain::from_file_line(Path::new("sources/a.txt"), "Example.GOUV.fr");
        assert_eq!(d.name, "example.gouv.fr");
        assert_eq!(d.comment, "");
        assert!(d.https_status.is_none());
        assert_eq!(d.source_file.as_deref(), Some(Path::new("sources/a.txt")));
    }

    #[test]
    fn test_from_file_line_comment() {
        let d = Domain::from_file_line(Path::new("a.txt"), "beta.gouv.fr  # startup studio");
        assert_eq!(d.name, "beta.gouv.fr");
        assert_eq!(d.comment, "startup studio");
    }

    #[test]
    fn test_from_file_line_https_url() {
        let d = Domain::from_file_line(Path::new("a.txt"), "https://www.soliha.fr/adil");
        assert_eq!(d.name, "www.soliha.fr");
        assert_eq!(d.https_status.as_deref(), Some("200 OK"));
        assert!(d.http_status.is_none());
    }

    #[test]
    fn test_from_file_line_http_url_with_port() {
        let d = Domain::from_file_line(Path::new("a.txt"), "http://example.fr:8080/");
        assert_eq!(d.name, "example.fr:8080");
        assert_eq!(d.http_status.as_deref(), Some("200 OK"));
    }

    #[test]
    fn test_url_prefers_https() {
        let mut d = Domain::new("example.fr");
        assert_eq!(d.url(), None);
        d.set_status(Scheme::Http, "200 OK".to_string());
        assert_eq!(d.url().as_deref(), Some("http://example.fr"));
        d.set_status(Scheme::Https, "200 OK".to_string());
        assert_eq!(d.url().as_deref(), Some("https://example.fr"));
        // A bare "200" without reason does not count.
        d.https_status = Some("200".to_string());
        assert_eq!(d.url().as_deref(), Some("http://example.fr"));
    }

    #[test]
    fn test_ordering_reversed_labels() {
        let mut domains = vec![
            Domain::new("zz.fr"),
            Domain::new("a.gouv.fr"),
            Domain::new("interieur.gouv.fr"),
            Domain::new("exemple.com"),
        ];
        domains.sort();
        let names: Vec<&str> = domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["exemple.com", "a.gouv.fr", "interieur.gouv.fr", "zz.fr"]
        );
    }

    #[test]
    fn test_equality_is_by_name() {
        let mut a = Domain::new("example.fr");
        let b = Domain::new("example.fr");
        a.set_status(Scheme::Https, "200 OK".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_not_public() {
        assert!(Domain::new("github.com").is_not_public());
        assert!(!Domain::new("culture.gouv.fr").is_not_public());
    }
}
