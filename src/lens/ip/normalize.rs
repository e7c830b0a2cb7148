//! Provider response normalization
//!
//! Every geolocation provider names its fields differently. Instead of one
//! conditional chain per provider, each canonical field has an ordered list of
//! candidate JSON paths in [`FIELD_CHAINS`]; the first present, non-empty value
//! wins. Supporting a new provider shape means adding candidates to the table.

use serde_json::{Map, Value};
use tracing::debug;

use super::error::{LookupError, LookupResult};
use super::types::{CanonicalLocation, UNKNOWN};

/// A canonical output field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Ip,
    City,
    Region,
    Country,
    Timezone,
    Isp,
    Latitude,
    Longitude,
}

/// Candidate source paths for one canonical field, highest priority first.
///
/// A path is a list of keys; `&["timezone", "id"]` reads `raw.timezone.id`.
pub struct FieldChain {
    pub field: Field,
    pub candidates: &'static [&'static [&'static str]],
}

pub const FIELD_CHAINS: &[FieldChain] = &[
    FieldChain {
        field: Field::Ip,
        candidates: &[&["ip"], &["IPv4"], &["query"]],
    },
    FieldChain {
        field: Field::City,
        candidates: &[&["city"]],
    },
    FieldChain {
        field: Field::Region,
        candidates: &[
            &["region"],
            &["region_code"],
            &["region_name"],
            &["regionName"],
            &["state"],
        ],
    },
    FieldChain {
        field: Field::Country,
        candidates: &[&["country"], &["country_name"]],
    },
    FieldChain {
        field: Field::Timezone,
        candidates: &[&["timezone", "id"], &["timezone"], &["time_zone"]],
    },
    FieldChain {
        field: Field::Isp,
        candidates: &[
            &["connection", "isp"],
            &["connection", "organization"],
            &["org"],
            &["isp"],
        ],
    },
    FieldChain {
        field: Field::Latitude,
        candidates: &[&["latitude"], &["lat"]],
    },
    FieldChain {
        field: Field::Longitude,
        candidates: &[&["longitude"], &["lon"], &["lng"]],
    },
];

/// Normalize a raw provider payload into a [`CanonicalLocation`].
///
/// Payloads that explicitly signal failure (`success: false`, a truthy
/// `error`, or `status: "fail"`) yield [`LookupError::ProviderFailure`];
/// anything that is not a JSON object is [`LookupError::MalformedResponse`].
pub fn normalize(raw: &Value) -> LookupResult<CanonicalLocation> {
    let obj = raw.as_object().ok_or_else(|| {
        LookupError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(raw)
        ))
    })?;

    if let Some(message) = failure_signal(obj) {
        return Err(LookupError::ProviderFailure(message));
    }

    let mut loc = CanonicalLocation::unknown();
    for chain in FIELD_CHAINS {
        match chain.field {
            Field::Latitude => loc.latitude = first_coordinate(raw, chain, 90.0),
            Field::Longitude => loc.longitude = first_coordinate(raw, chain, 180.0),
            field => {
                let value = first_text(raw, chain).unwrap_or_else(|| UNKNOWN.to_string());
                match field {
                    Field::Ip => loc.ip = value,
                    Field::City => loc.city = value,
                    Field::Region => loc.region = value,
                    Field::Country => loc.country = value,
                    Field::Timezone => loc.timezone = value,
                    Field::Isp => loc.isp = value,
                    Field::Latitude | Field::Longitude => {}
                }
            }
        }
    }

    debug!(
        "normalized location: ip={} location={} coordinates={:?}",
        loc.ip,
        loc.location_line(),
        loc.coordinates()
    );
    Ok(loc)
}

/// Failure message of a payload that explicitly signals an error, if any
pub fn failure_message(raw: &Value) -> Option<String> {
    raw.as_object().and_then(failure_signal)
}

/// Explicit failure markers used by the known providers
fn failure_signal(obj: &Map<String, Value>) -> Option<String> {
    let failed = matches!(obj.get("success"), Some(Value::Bool(false)))
        || matches!(obj.get("error"), Some(v) if !matches!(v, Value::Null | Value::Bool(false)))
        || matches!(obj.get("status"), Some(Value::String(s)) if s.eq_ignore_ascii_case("fail"));

    if !failed {
        return None;
    }

    let message = ["message", "reason", "error"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "provider reported an error".to_string());
    Some(message)
}

fn lookup_path<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(raw, |v, key| v.as_object()?.get(*key))
}

fn first_text(raw: &Value, chain: &FieldChain) -> Option<String> {
    chain
        .candidates
        .iter()
        .filter_map(|path| lookup_path(raw, path))
        .find_map(text_value)
}

fn text_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_coordinate(raw: &Value, chain: &FieldChain, limit: f64) -> Option<f64> {
    chain
        .candidates
        .iter()
        .filter_map(|path| lookup_path(raw, path))
        .find_map(coordinate_value)
        .filter(|c| c.abs() <= limit)
}

/// Finite numbers and numeric strings are accepted; everything else is absent
fn coordinate_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
