//! The HTTP prober.
//!
//! One `reqwest::Client` is built up front and shared by every probe, so
//! connection pooling works across the whole run. Automatic redirect
//! following is disabled: a redirect that leaves the probed domain is a
//! terminal answer (the domain told us where it lives now), while one that
//! stays on it is followed like a browser would.

use std::time::{Duration, Instant};

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::error::Result;
use crate::probe::outcome::{classify_error, ProbeOutcome};
use crate::probe::ProbeReport;

/// Advertised on every request so probed operators can find out who we are.
pub const USER_AGENT: &str = "See https://github.com/etalab/veilleur";

/// Total time allowed per request, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
}

impl ProbeClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Probe a domain over HTTPS then HTTP and report both messages.
    #[instrument(skip(self), fields(domain = %name))]
    pub async fn probe_domain(&self, name: &str) -> ProbeReport {
        let started = Instant::now();
        let https_status = self.probe_url(&format!("https://{name}")).await;
        let http_status = self.probe_url(&format!("http://{name}")).await;
        ProbeReport {
            name: name.to_string(),
            https_status,
            http_status,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Probe one URL and resolve it to a status message.
    pub async fn probe_url(&self, url: &str) -> String {
        match self.walk(url, Method::HEAD, MAX_REDIRECTS).await {
            Ok(outcome) => outcome.message(),
            Err(err) => {
                let message = classify_error(&err);
                debug!(%url, %message, "probe failed");
                message
            }
        }
    }

    /// Issue requests until something other than a followable redirect comes
    /// back. HEAD is tried first; a 405 restarts the walk with GET, redirect
    /// budget refilled.
    async fn walk(
        &self,
        url: &str,
        mut method: Method,
        mut budget: u32,
    ) -> std::result::Result<ProbeOutcome, reqwest::Error> {
        let mut url = url.to_string();
        loop {
            let response = self.client.request(method.clone(), &url).send().await?;
            let status = response.status();
            debug!(%url, %method, status = status.as_u16(), "response");

            if status == StatusCode::METHOD_NOT_ALLOWED && method == Method::HEAD {
                method = Method::GET;
                budget = MAX_REDIRECTS;
                continue;
            }

            // Header values are not always UTF-8, keep what we can read.
            let location = response
                .headers()
                .get(LOCATION)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

            if is_redirect(status.as_u16()) && budget > 0 {
                if let Some(dest) = location
                    .as_deref()
                    .and_then(|loc| join_same_domain(&url, loc))
                {
                    budget -= 1;
                    url = dest;
                    continue;
                }
            }

            return Ok(ProbeOutcome { status, location });
        }
    }
}

fn is_redirect(code: u16) -> bool {
    code > 300 && code < 400
}

/// Resolve `location` against `base` and keep it only when it stays on the
/// same host and port, so `http://munster.alsace` following its redirect to
/// `http://www.munster.alsace` counts as a move, not a hop.
fn join_same_domain(base: &str, location: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    let dest = base.join(location).ok()?;
    (base.host_str() == dest.host_str() && base.port() == dest.port())
        .then(|| dest.to_string())
}
