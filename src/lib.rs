#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! iptrack - IP address and domain geolocation lookup
//!
//! iptrack looks up where an IPv4 address or a domain name is located. It can
//! be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `lens-core` | Query classification and provider normalization | `serde_json` |
//! | `lens-net` | DNS-over-HTTPS resolver and HTTP geolocation providers | `ureq` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Full CLI binary | All above + `clap` |
//!
//! ```toml
//! # Pure classification/normalization, bring your own transport
//! iptrack = { version = "0.1", default-features = false, features = ["lens-core"] }
//!
//! # Default (CLI binary)
//! iptrack = "0.1"
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: business logic (feature-gated)
//!   - `ip::classify`: IPv4 literal / domain name / invalid
//!   - `ip::resolver`: domain to IPv4 through DNS-over-HTTPS
//!   - `ip::provider`: geolocation providers
//!   - `ip::normalize`: provider JSON to [`lens::ip::CanonicalLocation`]
//!   - `ip::session`: rendering into map and panel collaborators
//!
//! - **[`config`]**: Configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use iptrack::lens::ip::{classify, normalize, QueryClassification};
//! use serde_json::json;
//!
//! assert!(matches!(classify("8.8.8.8"), QueryClassification::IpLiteral(_)));
//!
//! let loc = normalize(&json!({"ip": "8.8.8.8", "country_name": "United States"}))?;
//! assert_eq!(loc.country, "United States");
//! ```

pub mod config;

// Lens module - feature gated
#[cfg(any(feature = "lens-core", feature = "lens-net"))]
pub mod lens;

// =============================================================================
// Configuration (always available)
// =============================================================================

pub use config::IptrackConfig;

// =============================================================================
// Lens Module - Feature-gated exports
// =============================================================================

#[cfg(any(feature = "lens-core", feature = "lens-net"))]
pub use lens::utils::OutputFormat;

#[cfg(feature = "lens-core")]
pub use lens::ip::{
    classify, normalize, CanonicalLocation, IpLens, LookupError, LookupSession,
    QueryClassification,
};
