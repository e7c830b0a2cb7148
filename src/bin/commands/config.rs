use iptrack::{IptrackConfig, OutputFormat};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    config_file_exists: bool,
    #[serde(flatten)]
    settings: IptrackConfig,
}

pub fn run(config: &IptrackConfig, output_format: OutputFormat) {
    let config_file = IptrackConfig::config_file_path();
    let config_info = ConfigInfo {
        config_file_exists: Path::new(&config_file).exists(),
        config_file,
        settings: config.clone(),
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(&config_info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing config info: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&config_info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing config info: {}", e),
        },
        _ => print_config(&config_info),
    }
}

fn print_config(info: &ConfigInfo) {
    println!("iptrack Configuration");
    println!("=====================\n");

    println!("General:");
    println!(
        "  Config file:    {} ({})",
        info.config_file,
        if info.config_file_exists {
            "exists"
        } else {
            "not created"
        }
    );
    println!();

    println!("Lookup:");
    for line in info.settings.summary().lines() {
        println!("  {}", line);
    }

    eprintln!();
    eprintln!("Tips:");
    eprintln!("  Use --format json for machine-readable output");
    eprintln!("  Set IPTRACK_PROVIDER or IPTRACK_TIMEOUT_SECS to override settings");
    eprintln!("  Edit ~/.iptrack/iptrack.toml to customize settings");
}
