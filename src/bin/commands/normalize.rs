use clap::Args;
use iptrack::lens::ip::{normalize, LookupError};
use iptrack::OutputFormat;
use json_to_table::json_to_table;
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;

/// Arguments for the Normalize command
#[derive(Args)]
pub struct NormalizeArgs {
    /// Provider response file; reads stdin when omitted
    pub file: Option<PathBuf>,
}

fn read_input(file: &Option<PathBuf>) -> anyhow::Result<String> {
    let mut content = String::new();
    match file {
        Some(path) => {
            content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("unable to read {}: {}", path.display(), e))?;
        }
        None => {
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| anyhow::anyhow!("unable to read stdin: {}", e))?;
        }
    }
    Ok(content)
}

pub fn run(args: NormalizeArgs, output_format: OutputFormat) {
    let NormalizeArgs { file } = args;

    let content = match read_input(&file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let result = serde_json::from_str::<Value>(&content)
        .map_err(|e| LookupError::MalformedResponse(e.to_string()))
        .and_then(|raw| normalize(&raw));

    let loc = match result {
        Ok(loc) => loc,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    match output_format {
        OutputFormat::Text => println!("{}", loc.to_text()),
        OutputFormat::Psv => {
            println!("ip|city|region|country|timezone|isp|latitude|longitude");
            println!(
                "{}|{}|{}|{}|{}|{}|{}|{}",
                loc.ip,
                loc.city,
                loc.region,
                loc.country,
                loc.timezone,
                loc.isp,
                loc.latitude.map(|v| v.to_string()).unwrap_or_default(),
                loc.longitude.map(|v| v.to_string()).unwrap_or_default(),
            );
        }
        OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::JsonLine => {
            super::print_json(&[&loc], output_format)
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            let json_value = json!(&loc);
            let mut table = json_to_table(&json_value);
            table.collapse();
            println!("{}", table);
        }
    }
}
