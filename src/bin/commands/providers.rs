use iptrack::lens::ip::{LookupTarget, ProviderKind};
use iptrack::OutputFormat;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Serialize, Tabled)]
struct ProviderRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lookup URL")]
    lookup_url: String,
    #[tabled(rename = "Self URL")]
    self_url: String,
}

pub fn run(output_format: OutputFormat) {
    let example = LookupTarget::Ip("{ip}".to_string());
    let rows: Vec<ProviderRow> = ProviderKind::all()
        .iter()
        .map(|p| ProviderRow {
            name: p.to_string(),
            lookup_url: p.url_for(&example),
            self_url: p.url_for(&LookupTarget::SelfIp),
        })
        .collect();

    match output_format {
        OutputFormat::Table => println!("{}", Table::new(&rows).with(Style::rounded())),
        OutputFormat::Markdown => println!("{}", Table::new(&rows).with(Style::markdown())),
        OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::JsonLine => {
            super::print_json(&rows, output_format)
        }
        OutputFormat::Text | OutputFormat::Psv => {
            for r in &rows {
                println!("{}|{}|{}", r.name, r.lookup_url, r.self_url);
            }
        }
    }
}
