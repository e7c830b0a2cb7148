//! Query classification
//!
//! Decides whether a raw search string is an IPv4 literal, a domain name, or
//! something that cannot be looked up. Classification never touches the
//! network; domain resolution lives in [`super::resolver`].

use serde::{Deserialize, Serialize};

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Result of classifying a raw user query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QueryClassification {
    /// Dotted-quad IPv4 literal
    IpLiteral(String),
    /// Domain name, lowercased
    DomainName(String),
    /// Empty or unparseable input
    Invalid,
}

impl QueryClassification {
    pub fn is_invalid(&self) -> bool {
        matches!(self, QueryClassification::Invalid)
    }
}

impl std::fmt::Display for QueryClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryClassification::IpLiteral(_) => write!(f, "ip"),
            QueryClassification::DomainName(_) => write!(f, "domain"),
            QueryClassification::Invalid => write!(f, "invalid"),
        }
    }
}

/// Classify a raw query string.
///
/// Total over all inputs: whitespace is trimmed, empty input is `Invalid`.
/// IPv6 literals are `Invalid`.
pub fn classify(raw: &str) -> QueryClassification {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return QueryClassification::Invalid;
    }

    if is_ipv4_literal(trimmed) {
        return QueryClassification::IpLiteral(trimmed.to_string());
    }

    if is_domain_name(trimmed) {
        return QueryClassification::DomainName(trimmed.to_ascii_lowercase());
    }

    QueryClassification::Invalid
}

/// Four dot-separated groups of 1-3 decimal digits, each in 0..=255
pub fn is_ipv4_literal(s: &str) -> bool {
    let groups: Vec<&str> = s.split('.').collect();
    groups.len() == 4
        && groups.iter().all(|g| {
            !g.is_empty()
                && g.len() <= 3
                && g.bytes().all(|b| b.is_ascii_digit())
                && g.parse::<u16>().map(|v| v <= 255).unwrap_or(false)
        })
}

fn is_domain_name(s: &str) -> bool {
    if s.len() > MAX_DOMAIN_LEN || s.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });

    // top-level label: at least two letters, nothing else
    let tld_ok = labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic()))
        .unwrap_or(false);

    labels_ok && tld_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_literals() {
        for ip in ["8.8.8.8", "0.0.0.0", "255.255.255.255", "192.168.1.1"] {
            assert_eq!(classify(ip), QueryClassification::IpLiteral(ip.to_string()));
        }
        assert_eq!(
            classify("  1.1.1.1\n"),
            QueryClassification::IpLiteral("1.1.1.1".to_string())
        );
    }

    #[test]
    fn test_dotted_ip_is_not_domain() {
        assert!(!matches!(
            classify("192.168.1.1"),
            QueryClassification::DomainName(_)
        ));
    }

    #[test]
    fn test_out_of_range_ipv4() {
        assert_eq!(classify("256.1.1.1"), QueryClassification::Invalid);
        assert_eq!(classify("1.2.3"), QueryClassification::Invalid);
        assert_eq!(classify("1.2.3.4.5"), QueryClassification::Invalid);
        assert_eq!(classify("1.2.3.1000"), QueryClassification::Invalid);
        assert_eq!(classify("1..2.3"), QueryClassification::Invalid);
    }

    #[test]
    fn test_domain_names() {
        assert_eq!(
            classify("example.com"),
            QueryClassification::DomainName("example.com".to_string())
        );
        assert_eq!(
            classify("Sub-Domain.Example.ORG"),
            QueryClassification::DomainName("sub-domain.example.org".to_string())
        );
        assert_eq!(
            classify("nonexistent-domain-xyz.test"),
            QueryClassification::DomainName("nonexistent-domain-xyz.test".to_string())
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(classify(""), QueryClassification::Invalid);
        assert_eq!(classify("   "), QueryClassification::Invalid);
        assert_eq!(classify("not a domain"), QueryClassification::Invalid);
        assert_eq!(classify("localhost"), QueryClassification::Invalid);
        assert_eq!(classify("example.c"), QueryClassification::Invalid);
        assert_eq!(classify("example.c0m"), QueryClassification::Invalid);
        assert_eq!(classify("-bad.example.com"), QueryClassification::Invalid);
        assert_eq!(classify("example..com"), QueryClassification::Invalid);
        assert_eq!(classify("3com.com"), QueryClassification::Invalid);
    }

    #[test]
    fn test_ipv6_is_invalid() {
        assert_eq!(classify("2001:db8::1"), QueryClassification::Invalid);
        assert_eq!(classify("::1"), QueryClassification::Invalid);
    }

    #[test]
    fn test_overlong_label() {
        let domain = format!("{}.com", "a".repeat(64));
        assert_eq!(classify(&domain), QueryClassification::Invalid);
    }
}
