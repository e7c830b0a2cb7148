use clap::Args;
use iptrack::lens::ip::{
    CanonicalLocation, InfoPanel, IpLens, IpLookupArgs, LookupSession, MapView, UNKNOWN,
};
use iptrack::lens::utils::{truncate_name, DEFAULT_NAME_MAX_LEN};
use iptrack::{IptrackConfig, OutputFormat};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupArgs {
    #[clap(flatten)]
    pub lookup: IpLookupArgs,

    /// Print the resolved IP address only
    #[clap(short, long)]
    pub simple: bool,
}

/// Map collaborator for the terminal: remembers the view and turns the marker into a link
#[derive(Debug, Default)]
struct TerminalMap {
    view: Option<(f64, f64, u8)>,
    marker: Option<(f64, f64)>,
}

impl TerminalMap {
    fn link(&self) -> Option<String> {
        let (lat, lng) = self.marker?;
        let zoom = self.view.map(|(_, _, z)| z).unwrap_or(13);
        Some(format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}"
        ))
    }
}

impl MapView for TerminalMap {
    fn set_view(&mut self, lat: f64, lng: f64, zoom: u8) {
        self.view = Some((lat, lng, zoom));
    }

    fn place_marker(&mut self, lat: f64, lng: f64, label: Option<&str>) {
        tracing::debug!("marker at {}, {} ({})", lat, lng, label.unwrap_or(UNKNOWN));
        self.marker = Some((lat, lng));
    }

    fn clear_marker(&mut self) {
        self.marker = None;
    }
}

/// Panel collaborator for the terminal: the four text fields
#[derive(Debug, Default, Clone)]
struct TerminalPanel {
    ip: String,
    location: String,
    timezone: String,
    isp: String,
}

impl InfoPanel for TerminalPanel {
    fn set_ip(&mut self, ip: &str) {
        self.ip = ip.to_string();
    }

    fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    fn set_timezone(&mut self, timezone: &str) {
        self.timezone = timezone.to_string();
    }

    fn set_isp(&mut self, isp: &str) {
        self.isp = isp.to_string();
    }
}

#[derive(Tabled)]
struct LookupRow {
    #[tabled(rename = "Query")]
    query: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Timezone")]
    timezone: String,
    #[tabled(rename = "ISP")]
    isp: String,
    #[tabled(rename = "Map")]
    map: String,
}

#[derive(Serialize)]
struct LookupOutput {
    query: String,
    #[serde(flatten)]
    location: CanonicalLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(config: &IptrackConfig, args: LookupArgs, output_format: OutputFormat) {
    let LookupArgs { lookup, simple } = args;

    let provider = lookup.provider.unwrap_or(config.provider);
    let lens = IpLens::with_provider(config, provider);
    let mut session = LookupSession::new(TerminalMap::default(), TerminalPanel::default());

    // no query: look up our own address, like on page load
    let queries = if lookup.queries.is_empty() {
        vec![String::new()]
    } else {
        lookup.queries
    };

    let mut rows = vec![];
    let mut outputs = vec![];
    let mut failed = false;
    for query in queries {
        let shown = if query.trim().is_empty() {
            "(self)".to_string()
        } else {
            query.trim().to_string()
        };

        let (result, _) = lens.run(&mut session, &query);
        let error = match &result {
            Ok(_) => None,
            Err(e) => {
                eprintln!("ERROR: unable to look up {}: {}", shown, e);
                failed = true;
                Some(e.to_string())
            }
        };

        let panel = session.panel().clone();
        let map_url = session.map().link();
        rows.push(LookupRow {
            query: shown.clone(),
            ip: panel.ip,
            location: panel.location,
            timezone: panel.timezone,
            isp: truncate_name(&panel.isp, DEFAULT_NAME_MAX_LEN),
            map: map_url.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        });
        outputs.push(LookupOutput {
            query: shown,
            location: session.current().cloned().unwrap_or_default(),
            map_url,
            error,
        });
    }

    if simple {
        for row in &rows {
            println!("{}", row.ip);
        }
    } else {
        format_output(rows, &outputs, output_format);
    }

    if failed {
        std::process::exit(1);
    }
}

fn format_output(
    rows: Vec<LookupRow>,
    outputs: &[LookupOutput],
    output_format: OutputFormat,
) {
    match output_format {
        OutputFormat::Table => {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        OutputFormat::Markdown => {
            println!("{}", Table::new(rows).with(Style::markdown()));
        }
        OutputFormat::Text => {
            let blocks: Vec<String> = outputs
                .iter()
                .map(|o| {
                    let mut block = format!("Query: {}\n", o.query);
                    block.push_str(&o.location.to_text());
                    if let Some(url) = &o.map_url {
                        block.push_str(&format!("\nMap: {}", url));
                    }
                    block
                })
                .collect();
            println!("{}", blocks.join("\n\n"));
        }
        OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::JsonLine => {
            super::print_json(outputs, output_format);
        }
        OutputFormat::Psv => {
            println!("query|ip|location|timezone|isp|map");
            for (r, o) in rows.iter().zip(outputs) {
                println!(
                    "{}|{}|{}|{}|{}|{}",
                    r.query, r.ip, r.location, r.timezone, o.location.isp, r.map
                );
            }
        }
    }
}
