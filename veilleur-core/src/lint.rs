//! Consistency checks over the source files and the table.
//!
//! Lint only reports, it never rewrites a file. The checks mirror what the
//! refresh pipeline assumes: sorted source files, one plausible lowercase
//! domain name per line, no duplicates, and a table that only carries names
//! still present in the sources.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::DomainTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
    pub file: PathBuf,
    /// 1-based line, `None` for whole-file issues.
    pub line: Option<usize>,
    pub message: String,
}

impl LintIssue {
    fn file_level(file: &Path, message: impl Into<String>) -> Self {
        Self {
            file: file.to_path_buf(),
            line: None,
            message: message.into(),
        }
    }

    fn at_line(file: &Path, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.to_path_buf(),
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file.display(), line, self.message),
            None => write!(f, "{}: {}", self.file.display(), self.message),
        }
    }
}

/// Check the source files: sortedness, name plausibility, case and
/// duplicates across all files.
pub fn lint_sources(files: &[PathBuf]) -> Result<Vec<LintIssue>> {
    let mut issues = Vec::new();
    // name -> first site, for cross-file duplicate reporting
    let mut seen: HashMap<String, String> = HashMap::new();

    for file in files {
        let content = fs::read_to_string(file)?;
        let lines: Vec<&str> = content.lines().collect();

        let mut sorted = lines.clone();
        sorted.sort_unstable();
        if lines != sorted {
            issues.push(LintIssue::file_level(file, "file is not sorted"));
        }

        for (lineno, raw) in lines.iter().enumerate() {
            let lineno = lineno + 1;
            let token = raw.split('#').next().unwrap_or_default().trim();
            if token.is_empty() {
                continue;
            }

            if !looks_like_domain(&token.to_lowercase()) {
                issues.push(LintIssue::at_line(
                    file,
                    lineno,
                    format!("{token:?} does not look like a domain name"),
                ));
            }
            if token != token.to_lowercase() {
                issues.push(LintIssue::at_line(
                    file,
                    lineno,
                    format!("{token:?} is not lowercase"),
                ));
            }
            let site = format!("{}:{}", file.display(), lineno);
            match seen.get(token) {
                Some(first) => issues.push(LintIssue::at_line(
                    file,
                    lineno,
                    format!("duplicate domain {token:?} (already seen in {first})"),
                )),
                None => {
                    seen.insert(token.to_string(), site);
                }
            }
        }
    }
    Ok(issues)
}

/// Check that every table row still has a backing source entry.
pub fn lint_table(
    table: &DomainTable,
    table_file: &Path,
    source_names: &HashSet<String>,
) -> Vec<LintIssue> {
    table
        .iter_sorted()
        .into_iter()
        .filter(|domain| !source_names.contains(&domain.name))
        .map(|domain| {
            LintIssue::file_level(
                table_file,
                format!("{:?} not found in any source file", domain.name),
            )
        })
        .collect()
}

/// A plausible dataset entry: dot-separated labels of ASCII alphanumerics
/// and inner hyphens, with an optional `:port` suffix.
fn looks_like_domain(name: &str) -> bool {
    let host = match name.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            host
        }
        None => name,
    };
    if !host.contains('.') {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_looks_like_domain() {
        assert!(looks_like_domain("interieur.gouv.fr"));
        assert!(looks_like_domain("xn--dpartement-c5b.fr"));
        assert!(looks_like_domain("example.fr:8443"));
        assert!(!looks_like_domain("nodots"));
        assert!(!looks_like_domain("double..dot.fr"));
        assert!(!looks_like_domain("-edge.fr"));
        assert!(!looks_like_domain("edge-.fr"));
        assert!(!looks_like_domain("spaces in.fr"));
        assert!(!looks_like_domain("example.fr:port"));
        assert!(!looks_like_domain("https://example.fr/"));
    }

    #[test]
    fn test_lint_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_source(
            dir.path(),
            "communes.txt",
            "# header\nambert.fr\nannecy.fr\n",
        );
        assert!(lint_sources(&[file]).unwrap().is_empty());
    }

    #[test]
    fn test_lint_unsorted_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_source(dir.path(), "communes.txt", "b.fr\na.fr\n");
        let issues = lint_sources(&[file]).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].line.is_none());
        assert_eq!(issues[0].message, "file is not sorted");
    }

    #[test]
    fn test_lint_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_source(dir.path(), "a.txt", "AMBERT.FR\nnot a domain\n");
        let issues = lint_sources(&[file]).unwrap();
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.contains(&"\"AMBERT.FR\" is not lowercase"));
        assert!(messages.contains(&"\"not a domain\" does not look like a domain name"));
    }

    #[test]
    fn test_lint_duplicates_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_source(dir.path(), "a.txt", "ambert.fr\n");
        let b = write_source(dir.path(), "b.txt", "ambert.fr\n");
        let issues = lint_sources(&[a.clone(), b]).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(1));
        assert!(issues[0]
            .message
            .contains(&format!("already seen in {}:1", a.display())));
    }

    #[test]
    fn test_lint_table_orphans() {
        use crate::domain::Domain;

        let mut table = DomainTable::default();
        table.insert(Domain::new("orpheline.fr"));
        table.insert(Domain::new("ambert.fr"));
        let sources: HashSet<String> = ["ambert.fr".to_string()].into_iter().collect();

        let issues = lint_table(&table, Path::new("domains.csv"), &sources);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "\"orpheline.fr\" not found in any source file"
        );
    }

    #[test]
    fn test_issue_display() {
        let at = LintIssue::at_line(Path::new("sources/a.txt"), 3, "boom");
        assert_eq!(at.to_string(), "sources/a.txt:3: boom");
        let whole = LintIssue::file_level(Path::new("sources/a.txt"), "boom");
        assert_eq!(whole.to_string(), "sources/a.txt: boom");
    }
}
