pub mod colors;
pub mod denylist;
pub mod domain;
pub mod error;
pub mod lint;
pub mod output;
pub mod partition;
pub mod probe;
pub mod refresh;
pub mod sources;
pub mod table;
pub mod urls;

pub use error::{Result, VeilleurError};

pub use domain::{Domain, Scheme};
pub use partition::{filter_domains, Partition};
pub use probe::{ProbeClient, ProbeReport};
pub use sources::{list_source_files, parse_files};
pub use table::DomainTable;

pub use lint::{lint_sources, lint_table, LintIssue};
pub use refresh::{RefreshRunner, RefreshSummary};
pub use urls::{urls_text, write_urls};

pub use output::{OutputFormat, OutputFormatter};
