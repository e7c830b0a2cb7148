use clap::{Parser, Subcommand};
use iptrack::*;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.iptrack/iptrack.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format
    #[clap(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up geolocation for IP addresses or domain names (your own IP if none given).
    Lookup(commands::lookup::LookupArgs),

    /// Classify queries as IPv4 literal, domain name, or invalid, without any network access.
    Classify(commands::classify::ClassifyArgs),

    /// Normalize a raw geolocation provider JSON document (file or stdin).
    Normalize(commands::normalize::NormalizeArgs),

    /// List supported geolocation providers.
    Providers,

    /// Show effective configuration.
    Config,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match IptrackConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: unable to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&config, args, cli.format),
        Commands::Classify(args) => commands::classify::run(args, cli.format),
        Commands::Normalize(args) => commands::normalize::run(args, cli.format),
        Commands::Providers => commands::providers::run(cli.format),
        Commands::Config => commands::config::run(&config, cli.format),
    }
}
