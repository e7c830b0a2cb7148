pub mod classify;
pub mod config;
pub mod lookup;
pub mod normalize;
pub mod providers;

use iptrack::OutputFormat;
use serde::Serialize;

/// Print serializable rows in one of the JSON formats
pub(crate) fn print_json<T: Serialize>(rows: &[T], output_format: OutputFormat) {
    let printed = match output_format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(rows).map(|s| println!("{}", s)),
        OutputFormat::JsonLine => rows.iter().try_for_each(|r| {
            serde_json::to_string(r).map(|s| println!("{}", s))
        }),
        _ => serde_json::to_string(rows).map(|s| println!("{}", s)),
    };
    if let Err(e) = printed {
        eprintln!("ERROR: Failed to serialize to JSON: {}", e);
    }
}
