use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "lens-core")]
use crate::lens::ip::resolver::DEFAULT_DOH_URL;
#[cfg(feature = "lens-core")]
use crate::lens::ip::ProviderKind;

#[cfg(not(feature = "lens-core"))]
const DEFAULT_DOH_URL: &str = "https://dns.google/resolve";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct IptrackConfig {
    /// Geolocation provider used when none is given on the command line
    #[cfg(feature = "lens-core")]
    pub provider: ProviderKind,

    /// JSON DNS-over-HTTPS endpoint used to resolve domain names
    pub dns_resolver_url: String,

    /// Timeout applied to every HTTP request, in seconds
    pub timeout_secs: u64,
}

const EMPTY_CONFIG: &str = r#"### iptrack configuration file

### geolocation provider: ipapi, ipwhois, geolocation-db, ip-api
# provider = "ipapi"

### JSON DNS-over-HTTPS resolver used for domain lookups
# dns_resolver_url = "https://dns.google/resolve"

### timeout for each HTTP request (in seconds)
# timeout_secs = 10
"#;

impl Default for IptrackConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "lens-core")]
            provider: ProviderKind::default(),
            dns_resolver_url: DEFAULT_DOH_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl IptrackConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<IptrackConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.iptrack/iptrack.toml as the configuration file path
                let iptrack_dir = Self::config_dir()?;
                std::fs::create_dir_all(iptrack_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create iptrack directory: {}", e))?;
                let p = format!("{}/iptrack.toml", iptrack_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of IPTRACK)
        // E.g., `IPTRACK_PROVIDER=ipwhois ./iptrack lookup 1.1.1.1`
        builder = builder.add_source(config::Environment::with_prefix("IPTRACK"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<IptrackConfig> {
        #[cfg(feature = "lens-core")]
        let provider = match config.get("provider") {
            Some(p) => p.parse::<ProviderKind>().map_err(|e| anyhow!(e))?,
            None => ProviderKind::default(),
        };

        let dns_resolver_url = config
            .get("dns_resolver_url")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DOH_URL.to_string());

        let timeout_secs = match config.get("timeout_secs") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow!("Invalid timeout_secs '{}': expected a positive integer", s))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(IptrackConfig {
            #[cfg(feature = "lens-core")]
            provider,
            dns_resolver_url,
            timeout_secs,
        })
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let mut lines = vec![];
        #[cfg(feature = "lens-core")]
        lines.push(format!("Provider:           {}", self.provider));
        lines.push(format!("DNS Resolver:       {}", self.dns_resolver_url));
        lines.push(format!("Request Timeout:    {} seconds", self.timeout_secs));
        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.iptrack/iptrack.toml", home_dir)
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.iptrack", home_dir))
    }
}
