use clap::Args;
use iptrack::lens::ip::{classify, QueryClassification};
use iptrack::OutputFormat;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Arguments for the Classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Queries to classify, e.g. "8.8.8.8" or "example.com"
    #[clap(required = true)]
    pub queries: Vec<String>,
}

#[derive(Serialize, Tabled)]
struct ClassifyRow {
    #[tabled(rename = "Query")]
    query: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn run(args: ClassifyArgs, output_format: OutputFormat) {
    let ClassifyArgs { queries } = args;

    let rows: Vec<ClassifyRow> = queries
        .into_iter()
        .map(|query| {
            let classification = classify(&query);
            let value = match &classification {
                QueryClassification::IpLiteral(v) | QueryClassification::DomainName(v) => v.clone(),
                QueryClassification::Invalid => String::new(),
            };
            ClassifyRow {
                query,
                kind: classification.to_string(),
                value,
            }
        })
        .collect();

    match output_format {
        OutputFormat::Table => println!("{}", Table::new(&rows).with(Style::rounded())),
        OutputFormat::Markdown => println!("{}", Table::new(&rows).with(Style::markdown())),
        OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::JsonLine => {
            super::print_json(&rows, output_format)
        }
        OutputFormat::Text => {
            for r in &rows {
                println!("{}: {}", r.query, r.kind);
            }
        }
        OutputFormat::Psv => {
            println!("query|type|value");
            for r in &rows {
                println!("{}|{}|{}", r.query, r.kind, r.value);
            }
        }
    }
}
