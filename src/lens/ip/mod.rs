//! IP geolocation lookup lens
//!
//! This module turns a raw search string (IPv4 literal or domain name) into a
//! provider-agnostic location record:
//!
//! 1. [`classify`] decides what the query is
//! 2. domains are resolved to an IPv4 address through a [`DnsResolver`]
//! 3. a [`GeoProvider`] returns raw JSON for the address
//! 4. [`normalize`] maps the provider's field names onto [`CanonicalLocation`]
//!
//! Rendering is done by a [`LookupSession`], which owns the map and panel
//! collaborators.

pub mod classify;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod types;

pub use classify::{classify, QueryClassification};
pub use error::{LookupError, LookupResult};
pub use normalize::normalize;
pub use provider::{GeoProvider, ProviderKind};
pub use resolver::{resolve_domain, DnsResolver};
pub use session::{Completion, InfoPanel, LookupSession, LookupTicket, MapView};
pub use types::{CanonicalLocation, Coordinates, LookupTarget, UNKNOWN};

#[cfg(feature = "lens-net")]
pub use provider::HttpGeoProvider;
#[cfg(feature = "lens-net")]
pub use resolver::DohResolver;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// =============================================================================
// Args
// =============================================================================

/// Arguments for IP lookup operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct IpLookupArgs {
    /// IP addresses or domain names to look up (if none given, looks up your public IP)
    #[cfg_attr(feature = "cli", clap(value_name = "QUERY"))]
    #[serde(default)]
    pub queries: Vec<String>,

    /// Geolocation provider to use (overrides the configured one)
    #[cfg_attr(feature = "cli", clap(short, long, value_enum))]
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

impl IpLookupArgs {
    /// Create new args for specific queries
    pub fn new(queries: Vec<String>) -> Self {
        Self {
            queries,
            provider: None,
        }
    }

    /// Create args for public IP lookup
    pub fn public_ip() -> Self {
        Self::default()
    }

    /// Set the provider
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }
}

// =============================================================================
// Lens
// =============================================================================

/// IP geolocation lookup lens
///
/// # Example
///
/// ```rust,ignore
/// use iptrack::lens::ip::IpLens;
/// use iptrack::IptrackConfig;
///
/// let config = IptrackConfig::default();
/// let lens = IpLens::from_config(&config);
///
/// let loc = lens.lookup("example.com")?;
/// println!("{} is in {}", loc.ip, loc.location_line());
/// ```
pub struct IpLens {
    resolver: Box<dyn DnsResolver>,
    provider: Box<dyn GeoProvider>,
}

impl IpLens {
    /// Create a lens from explicit collaborators
    pub fn new(resolver: Box<dyn DnsResolver>, provider: Box<dyn GeoProvider>) -> Self {
        Self { resolver, provider }
    }

    /// Create a lens using the configured DoH resolver and provider
    #[cfg(feature = "lens-net")]
    pub fn from_config(config: &crate::IptrackConfig) -> Self {
        Self::with_provider(config, config.provider)
    }

    /// Create a lens with the configured resolver but a specific provider
    #[cfg(feature = "lens-net")]
    pub fn with_provider(config: &crate::IptrackConfig, provider: ProviderKind) -> Self {
        let agent = crate::lens::utils::http_agent(config.timeout());
        Self {
            resolver: Box::new(DohResolver::new(
                agent.clone(),
                config.dns_resolver_url.clone(),
            )),
            provider: Box::new(HttpGeoProvider::new(agent, provider)),
        }
    }

    /// Turn a raw query into the IP to hand to the provider
    pub fn resolve_target(&self, query: &str) -> LookupResult<String> {
        match classify(query) {
            QueryClassification::IpLiteral(ip) => Ok(ip),
            QueryClassification::DomainName(domain) => {
                debug!("resolving domain {}", domain);
                resolve_domain(self.resolver.as_ref(), &domain)
            }
            QueryClassification::Invalid => Err(LookupError::InvalidInput(format!(
                "'{}' is neither an IPv4 address nor a domain name",
                query.trim()
            ))),
        }
    }

    /// Look up a query (IPv4 literal or domain name)
    pub fn lookup(&self, query: &str) -> LookupResult<CanonicalLocation> {
        let ip = self.resolve_target(query)?;
        self.fetch(&LookupTarget::Ip(ip))
    }

    /// Look up the caller's own public address
    pub fn lookup_self(&self) -> LookupResult<CanonicalLocation> {
        self.fetch(&LookupTarget::SelfIp)
    }

    /// Run a lookup and render the result into `session`.
    ///
    /// An empty query looks up the caller's own address.
    pub fn run<M: MapView, P: InfoPanel>(
        &self,
        session: &mut LookupSession<M, P>,
        query: &str,
    ) -> (LookupResult<CanonicalLocation>, Completion) {
        let ticket = session.begin();
        let result = if query.trim().is_empty() {
            self.lookup_self()
        } else {
            self.lookup(query)
        };
        let completion = session.complete(ticket, &result);
        (result, completion)
    }

    fn fetch(&self, target: &LookupTarget) -> LookupResult<CanonicalLocation> {
        let raw = self.provider.fetch(target)?;
        let loc = normalize(&raw)?;
        info!("located {} at {}", target, loc.location_line());
        Ok(loc)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeResolver {
        answer: LookupResult<String>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl DnsResolver for FakeResolver {
        fn resolve_a(&self, domain: &str) -> LookupResult<String> {
            self.calls.borrow_mut().push(domain.to_string());
            self.answer.clone()
        }
    }

    struct FakeProvider {
        payload: LookupResult<Value>,
        calls: Rc<RefCell<Vec<LookupTarget>>>,
    }

    impl GeoProvider for FakeProvider {
        fn fetch(&self, target: &LookupTarget) -> LookupResult<Value> {
            self.calls.borrow_mut().push(target.clone());
            self.payload.clone()
        }
    }

    type Calls = (Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<LookupTarget>>>);

    fn lens(answer: LookupResult<String>, payload: LookupResult<Value>) -> (IpLens, Calls) {
        let dns_calls = Rc::new(RefCell::new(Vec::new()));
        let geo_calls = Rc::new(RefCell::new(Vec::new()));
        let lens = IpLens::new(
            Box::new(FakeResolver {
                answer,
                calls: dns_calls.clone(),
            }),
            Box::new(FakeProvider {
                payload,
                calls: geo_calls.clone(),
            }),
        );
        (lens, (dns_calls, geo_calls))
    }

    #[derive(Default)]
    struct NullMap;

    impl MapView for NullMap {
        fn set_view(&mut self, _lat: f64, _lng: f64, _zoom: u8) {}
        fn place_marker(&mut self, _lat: f64, _lng: f64, _label: Option<&str>) {}
        fn clear_marker(&mut self) {}
    }

    #[derive(Default)]
    struct TextPanel {
        ip: String,
        location: String,
    }

    impl InfoPanel for TextPanel {
        fn set_ip(&mut self, ip: &str) {
            self.ip = ip.to_string();
        }
        fn set_location(&mut self, location: &str) {
            self.location = location.to_string();
        }
        fn set_timezone(&mut self, _timezone: &str) {}
        fn set_isp(&mut self, _isp: &str) {}
    }

    #[test]
    fn test_ip_literal_skips_resolution() {
        let payload = json!({
            "ip": "8.8.8.8",
            "city": "Mountain View",
            "country_name": "United States",
            "latitude": 37.4,
            "longitude": -122.07
        });
        let (lens, (dns_calls, geo_calls)) = lens(Ok("0.0.0.0".to_string()), Ok(payload));

        let loc = lens.lookup("8.8.8.8").unwrap();
        assert_eq!(
            loc,
            CanonicalLocation {
                ip: "8.8.8.8".to_string(),
                city: "Mountain View".to_string(),
                region: UNKNOWN.to_string(),
                country: "United States".to_string(),
                timezone: UNKNOWN.to_string(),
                isp: UNKNOWN.to_string(),
                latitude: Some(37.4),
                longitude: Some(-122.07),
            }
        );
        assert!(dns_calls.borrow().is_empty());
        assert_eq!(
            geo_calls.borrow().as_slice(),
            &[LookupTarget::Ip("8.8.8.8".to_string())]
        );
    }

    #[test]
    fn test_domain_is_resolved_first() {
        let (lens, (dns_calls, geo_calls)) = lens(
            Ok("93.184.216.34".to_string()),
            Ok(json!({"ip": "93.184.216.34"})),
        );

        let loc = lens.lookup("Example.com").unwrap();
        assert_eq!(loc.ip, "93.184.216.34");
        assert_eq!(dns_calls.borrow().as_slice(), &["example.com".to_string()]);
        assert_eq!(
            geo_calls.borrow().as_slice(),
            &[LookupTarget::Ip("93.184.216.34".to_string())]
        );
    }

    #[test]
    fn test_resolution_failure_resets_display() {
        let (lens, (_, geo_calls)) = lens(
            Err(LookupError::ResolutionFailure(
                "no answer for nonexistent-domain-xyz.test".to_string(),
            )),
            Ok(json!({"ip": "1.1.1.1"})),
        );
        let mut session = LookupSession::new(NullMap, TextPanel::default());

        let (ok, _) = lens.run(&mut session, "1.1.1.1");
        assert!(ok.is_ok());
        assert_eq!(session.panel().ip, "1.1.1.1");

        let (result, completion) = lens.run(&mut session, "nonexistent-domain-xyz.test");
        assert!(matches!(result, Err(LookupError::ResolutionFailure(_))));
        assert_eq!(completion, Completion::Applied);
        assert_eq!(session.panel().ip, UNKNOWN);
        assert_eq!(session.panel().location, UNKNOWN);
        // only the first lookup reached the provider
        assert_eq!(geo_calls.borrow().len(), 1);
    }

    #[test]
    fn test_invalid_input_never_hits_network() {
        let (lens, (dns_calls, geo_calls)) = lens(Ok("1.1.1.1".to_string()), Ok(json!({})));

        for query in ["not a domain", "2001:db8::1", "1.2.3"] {
            assert!(matches!(
                lens.lookup(query),
                Err(LookupError::InvalidInput(_))
            ));
        }
        assert!(dns_calls.borrow().is_empty());
        assert!(geo_calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_query_looks_up_self() {
        let (lens, (_, geo_calls)) = lens(
            Ok("1.1.1.1".to_string()),
            Ok(json!({"ip": "203.0.113.7", "city": "Lyon"})),
        );
        let mut session = LookupSession::new(NullMap, TextPanel::default());

        let (result, _) = lens.run(&mut session, "  ");
        assert_eq!(result.unwrap().ip, "203.0.113.7");
        assert_eq!(geo_calls.borrow().as_slice(), &[LookupTarget::SelfIp]);
        assert_eq!(session.panel().location, "Lyon");
    }

    #[test]
    fn test_provider_failure_payload() {
        let (lens, _) = lens(
            Ok("1.1.1.1".to_string()),
            Ok(json!({"success": false, "message": "Reserved range"})),
        );
        assert_eq!(
            lens.lookup("10.0.0.1").unwrap_err(),
            LookupError::ProviderFailure("Reserved range".to_string())
        );
    }
}
