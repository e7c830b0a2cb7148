//! Types for the IP lens

use serde::{Deserialize, Serialize};

/// Placeholder shown for any field no provider supplied
pub const UNKNOWN: &str = "—";

/// What a geolocation provider should be asked about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupTarget {
    /// A specific IPv4 address
    Ip(String),
    /// The caller's own public address (auto-detected by the provider)
    SelfIp,
}

impl std::fmt::Display for LookupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupTarget::Ip(ip) => write!(f, "{}", ip),
            LookupTarget::SelfIp => write!(f, "<self>"),
        }
    }
}

/// A latitude/longitude pair, only built when both sides are known
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Provider-agnostic location record handed to the renderer
///
/// Text fields always hold either a real value or [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLocation {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub timezone: String,
    pub isp: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CanonicalLocation {
    /// Record with every field unknown, used to reset the display
    pub fn unknown() -> Self {
        Self {
            ip: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            timezone: UNKNOWN.to_string(),
            isp: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
        }
    }

    /// Both coordinates, if both are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// "city, region, country" with unknown parts left out
    pub fn location_line(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .map(String::as_str)
            .filter(|s| *s != UNKNOWN)
            .collect();

        if parts.is_empty() {
            UNKNOWN.to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Plain "Key: value" lines
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!("IP: {}", self.ip),
            format!("Location: {}", self.location_line()),
            format!("Timezone: {}", self.timezone),
            format!("ISP: {}", self.isp),
        ];
        if let Some(c) = self.coordinates() {
            lines.push(format!("Coordinates: {}, {}", c.latitude, c.longitude));
        }
        lines.join("\n")
    }
}

impl Default for CanonicalLocation {
    fn default() -> Self {
        Self::unknown()
    }
}
