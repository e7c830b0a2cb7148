//! Geolocation providers
//!
//! Providers are interchangeable collaborators behind [`GeoProvider`]. They
//! return the raw JSON body; turning it into a canonical record is the job of
//! [`super::normalize`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::error::{LookupError, LookupResult};
use super::normalize::failure_message;
use super::types::LookupTarget;

/// Something that can fetch raw geolocation data for a target
pub trait GeoProvider {
    fn fetch(&self, target: &LookupTarget) -> LookupResult<Value>;
}

/// Known free geolocation services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ProviderKind {
    /// ipapi.co
    #[default]
    Ipapi,
    /// ipwho.is
    Ipwhois,
    /// geolocation-db.com
    GeolocationDb,
    /// ip-api.com
    IpApi,
}

impl ProviderKind {
    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::Ipapi,
            ProviderKind::Ipwhois,
            ProviderKind::GeolocationDb,
            ProviderKind::IpApi,
        ]
    }

    /// URL to query for a target
    pub fn url_for(&self, target: &LookupTarget) -> String {
        match (self, target) {
            (ProviderKind::Ipapi, LookupTarget::Ip(ip)) => format!("https://ipapi.co/{}/json/", ip),
            (ProviderKind::Ipapi, LookupTarget::SelfIp) => "https://ipapi.co/json/".to_string(),
            (ProviderKind::Ipwhois, LookupTarget::Ip(ip)) => format!("https://ipwho.is/{}", ip),
            (ProviderKind::Ipwhois, LookupTarget::SelfIp) => "https://ipwho.is/".to_string(),
            (ProviderKind::GeolocationDb, LookupTarget::Ip(ip)) => {
                format!("https://geolocation-db.com/json/{}", ip)
            }
            (ProviderKind::GeolocationDb, LookupTarget::SelfIp) => {
                "https://geolocation-db.com/json/".to_string()
            }
            (ProviderKind::IpApi, LookupTarget::Ip(ip)) => format!("http://ip-api.com/json/{}", ip),
            (ProviderKind::IpApi, LookupTarget::SelfIp) => "http://ip-api.com/json/".to_string(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ipapi => write!(f, "ipapi"),
            ProviderKind::Ipwhois => write!(f, "ipwhois"),
            ProviderKind::GeolocationDb => write!(f, "geolocation-db"),
            ProviderKind::IpApi => write!(f, "ip-api"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ipapi" | "ipapi.co" => Ok(Self::Ipapi),
            "ipwhois" | "ipwho.is" => Ok(Self::Ipwhois),
            "geolocation-db" | "geolocationdb" | "geolocation-db.com" => Ok(Self::GeolocationDb),
            "ip-api" | "ip-api.com" => Ok(Self::IpApi),
            _ => Err(format!(
                "Unknown provider '{}'. Valid providers: {}",
                s,
                Self::all()
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Interpret an HTTP response from a provider.
///
/// On a non-success status the provider's own error message is preferred over
/// the bare status code.
pub fn interpret_response(status: u16, body: &str) -> LookupResult<Value> {
    let parsed = serde_json::from_str::<Value>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|v| failure_message(&v))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(LookupError::ProviderFailure(message));
    }

    parsed.map_err(|e| LookupError::MalformedResponse(e.to_string()))
}

/// HTTP geolocation provider backed by `ureq`
#[cfg(feature = "lens-net")]
pub struct HttpGeoProvider {
    agent: ureq::Agent,
    kind: ProviderKind,
}

#[cfg(feature = "lens-net")]
impl HttpGeoProvider {
    pub fn new(agent: ureq::Agent, kind: ProviderKind) -> Self {
        Self { agent, kind }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }
}

#[cfg(feature = "lens-net")]
impl GeoProvider for HttpGeoProvider {
    fn fetch(&self, target: &LookupTarget) -> LookupResult<Value> {
        let url = self.kind.url_for(target);
        tracing::debug!("fetching geolocation from {}", url);

        let mut resp = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| LookupError::ProviderFailure(format!("request to {} failed: {}", url, e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .body_mut()
            .read_to_string()
            .map_err(|e| LookupError::MalformedResponse(format!("unable to read body: {}", e)))?;

        interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_urls() {
        let target = LookupTarget::Ip("8.8.8.8".to_string());
        assert_eq!(
            ProviderKind::Ipapi.url_for(&target),
            "https://ipapi.co/8.8.8.8/json/"
        );
        assert_eq!(
            ProviderKind::GeolocationDb.url_for(&LookupTarget::SelfIp),
            "https://geolocation-db.com/json/"
        );
        assert_eq!(
            ProviderKind::IpApi.url_for(&target),
            "http://ip-api.com/json/8.8.8.8"
        );
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("ipapi".parse::<ProviderKind>().unwrap(), ProviderKind::Ipapi);
        assert_eq!(
            "ipwho.is".parse::<ProviderKind>().unwrap(),
            ProviderKind::Ipwhois
        );
        assert_eq!(
            "Geolocation-DB".parse::<ProviderKind>().unwrap(),
            ProviderKind::GeolocationDb
        );
        assert!("maxmind".parse::<ProviderKind>().is_err());

        for kind in ProviderKind::all() {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_interpret_success() {
        let value = interpret_response(200, r#"{"ip": "8.8.8.8"}"#).unwrap();
        assert_eq!(value["ip"], "8.8.8.8");
    }

    #[test]
    fn test_interpret_error_status_with_reason() {
        assert_eq!(
            interpret_response(429, r#"{"error": true, "reason": "RateLimited"}"#).unwrap_err(),
            LookupError::ProviderFailure("RateLimited".to_string())
        );
    }

    #[test]
    fn test_interpret_error_status_without_marker() {
        assert_eq!(
            interpret_response(503, r#"{"ip": "8.8.8.8"}"#).unwrap_err(),
            LookupError::ProviderFailure("HTTP 503".to_string())
        );
        assert_eq!(
            interpret_response(502, "Bad Gateway").unwrap_err(),
            LookupError::ProviderFailure("HTTP 502".to_string())
        );
    }

    #[test]
    fn test_interpret_malformed_body() {
        assert!(matches!(
            interpret_response(200, "<html></html>"),
            Err(LookupError::MalformedResponse(_))
        ));
    }
}
