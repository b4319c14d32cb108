//! Parsing of the source files (`sources/*.txt`).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::Domain;
use crate::error::Result;

/// One record per line. Lines starting with `#` and blank lines are skipped;
/// inline comments are kept on the record.
pub fn parse_source_text(file: &Path, content: &str) -> Vec<Domain> {
    content
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(|line| Domain::from_file_line(file, line))
        .collect()
}

/// Parse many source files. The first occurrence of a name wins.
pub fn parse_files(files: &[PathBuf]) -> Result<Vec<Domain>> {
    let mut domains = Vec::new();
    let mut seen = HashSet::new();
    for file in files {
        let content = fs::read_to_string(file)?;
        for domain in parse_source_text(file, &content) {
            if seen.insert(domain.name.clone()) {
                domains.push(domain);
            }
        }
    }
    debug!(
        files = files.len(),
        domains = domains.len(),
        "parsed source files"
    );
    Ok(domains)
}

/// The `*.txt` files of a directory, sorted.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_text() {
        let content = "\
# Communes proposées par X
ambert.fr
annuaire-mairie.fr  # annuaire privé
https://www.acceslibre.beta.gouv.fr

UPPER.FR
";
        let domains = parse_source_text(Path::new("sources/communes.txt"), content);
        let names: Vec<&str> = domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ambert.fr",
                "annuaire-mairie.fr",
                "www.acceslibre.beta.gouv.fr",
                "upper.fr"
            ]
        );
        assert_eq!(domains[1].comment, "annuaire privé");
        assert_eq!(domains[2].https_status.as_deref(), Some("200 OK"));
    }

    #[test]
    fn test_parse_files_first_occurrence_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        fs::write(&first, "shared.fr  # from a\n").unwrap();
        fs::write(&second, "shared.fr  # from b\nonly-b.fr\n").unwrap();

        let domains = parse_files(&[first.clone(), second]).unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[0].name, "shared.fr");
        assert_eq!(domains[0].comment, "from a");
        assert_eq!(domains[0].source_file.as_deref(), Some(first.as_path()));
    }

    #[test]
    fn test_list_source_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let files = list_source_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }
}
