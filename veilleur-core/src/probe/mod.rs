//! HTTP liveness probing.
//!
//! A domain is probed over both schemes, HTTPS first, and each probe walks
//! same-domain redirects until it reaches a terminal answer. The resulting
//! messages are what `domains.csv` records, so they are kept short and
//! stable across runs.

mod client;
mod outcome;

pub use client::{ProbeClient, DEFAULT_TIMEOUT, USER_AGENT};
pub use outcome::ProbeOutcome;

use serde::{Deserialize, Serialize};

use crate::domain::status_is_ok;

/// Both scheme statuses for one domain, as produced by a probe pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub name: String,
    pub https_status: String,
    pub http_status: String,
    /// Wall time for both probes together, in milliseconds.
    pub duration_ms: u64,
}

impl ProbeReport {
    /// True when either scheme answered with a plain 200.
    pub fn is_reachable(&self) -> bool {
        status_is_ok(&self.https_status) || status_is_ok(&self.http_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_reachability() {
        let mut report = ProbeReport {
            name: "example.fr".to_string(),
            https_status: "Timeout".to_string(),
            http_status: "301 Moved Permanently https://elsewhere.fr/".to_string(),
            duration_ms: 40,
        };
        assert!(!report.is_reachable());
        report.http_status = "200 OK".to_string();
        assert!(report.is_reachable());
    }
}
