//! Common utility functions for lens modules
//!
//! Output format selection, name shortening for table cells, and the shared
//! HTTP agent used by network collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum length for ISP names in table cells
pub const DEFAULT_NAME_MAX_LEN: usize = 32;

/// Unified output format for all commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Plain "Key: value" lines
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Check if this is a table variant
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Markdown)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

/// Truncate a string to the specified length, adding "..." if truncated
///
/// ```
/// use iptrack::lens::utils::truncate_name;
///
/// assert_eq!(truncate_name("Cloudflare", 20), "Cloudflare");
/// assert_eq!(truncate_name("Google LLC Mountain View", 20), "Google LLC Mounta...");
/// ```
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Build the HTTP agent shared by the resolver and providers.
///
/// Non-2xx statuses are returned as responses so providers can surface the
/// error body; every request is bounded by `timeout`.
#[cfg(feature = "lens-net")]
pub fn http_agent(timeout: std::time::Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}
