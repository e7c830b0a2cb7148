//! Domain resolution over DNS-over-HTTPS
//!
//! The resolver is a collaborator behind the [`DnsResolver`] trait. The default
//! implementation talks to a JSON DoH endpoint (`dns.google/resolve` style) and
//! keeps the first A-record of the answer section.

use serde::Deserialize;
use tracing::{debug, warn};

use super::classify::is_ipv4_literal;
use super::error::{LookupError, LookupResult};

/// Default JSON DNS-over-HTTPS endpoint
pub const DEFAULT_DOH_URL: &str = "https://dns.google/resolve";

/// DNS record type number for A (IPv4 address) records
const RECORD_TYPE_A: u16 = 1;

/// Something that can turn a domain name into an IPv4 address
pub trait DnsResolver {
    /// Return the first A-record for `domain`.
    ///
    /// Implementations make exactly one attempt.
    fn resolve_a(&self, domain: &str) -> LookupResult<String>;
}

/// Resolve a domain, making sure the answer is a usable IPv4 literal
pub fn resolve_domain(resolver: &dyn DnsResolver, domain: &str) -> LookupResult<String> {
    let ip = resolver.resolve_a(domain)?;
    if !is_ipv4_literal(&ip) {
        warn!("resolver returned non-IPv4 data for {}: {}", domain, ip);
        return Err(LookupError::ResolutionFailure(format!(
            "resolver returned an unusable address for {}: {}",
            domain, ip
        )));
    }
    debug!("resolved {} -> {}", domain, ip);
    Ok(ip)
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer")]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// Pick the first A-record out of a DoH JSON response body
pub fn first_a_record(body: &str, domain: &str) -> LookupResult<String> {
    let resp: DohResponse = serde_json::from_str(body).map_err(|e| {
        LookupError::ResolutionFailure(format!("unreadable resolver response for {}: {}", domain, e))
    })?;

    let answers = resp
        .answer
        .ok_or_else(|| LookupError::ResolutionFailure(format!("no answer for {}", domain)))?;

    answers
        .into_iter()
        .find(|a| a.record_type == RECORD_TYPE_A)
        .map(|a| a.data)
        .ok_or_else(|| LookupError::ResolutionFailure(format!("no A record for {}", domain)))
}

/// JSON DNS-over-HTTPS resolver backed by `ureq`
#[cfg(feature = "lens-net")]
pub struct DohResolver {
    agent: ureq::Agent,
    url: String,
}

#[cfg(feature = "lens-net")]
impl DohResolver {
    pub fn new(agent: ureq::Agent, url: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "lens-net")]
impl DnsResolver for DohResolver {
    fn resolve_a(&self, domain: &str) -> LookupResult<String> {
        debug!("querying {} for A records of {}", self.url, domain);

        let mut resp = self
            .agent
            .get(&self.url)
            .query("name", domain)
            .query("type", "A")
            .header("Accept", "application/dns-json")
            .call()
            .map_err(|e| LookupError::ResolutionFailure(format!("resolver request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(LookupError::ResolutionFailure(format!(
                "resolver answered HTTP {}",
                resp.status().as_u16()
            )));
        }

        let body = resp.body_mut().read_to_string().map_err(|e| {
            LookupError::ResolutionFailure(format!("unable to read resolver response: {}", e))
        })?;

        first_a_record(&body, domain)
    }
}
