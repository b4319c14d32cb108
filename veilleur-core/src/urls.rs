//! Deriving `urls.txt`, the list of confirmed reachable URLs.
//!
//! One URL per table row that answered a plain 200 on either scheme,
//! https preferred, in table order. The file always ends with a newline.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::table::DomainTable;

pub fn urls_text(table: &DomainTable) -> String {
    let urls: Vec<String> = table
        .iter_sorted()
        .into_iter()
        .filter_map(|domain| domain.url())
        .collect();
    format!("{}\n", urls.join("\n"))
}

/// Regenerate the URL list file from the table.
pub fn write_urls(table: &DomainTable, path: &Path) -> Result<()> {
    let text = urls_text(table);
    fs::write(path, &text)?;
    debug!(
        urls = text.trim_end().lines().count(),
        path = %path.display(),
        "wrote url list"
    );
    Ok(())
}
