//! Patterns command - browse the pattern library and collections.

use clap::Args;
use console::style;
use serde_json::json;

use sigparse_core::patterns::{collection, CollectionName, SemanticField, LIBRARY_VERSION};

/// Arguments for the patterns command.
#[derive(Args)]
pub struct PatternsArgs {
    /// Only show this field (e.g. entry, stop_loss, tp)
    #[arg(long)]
    field: Option<String>,

    /// Show the rules of a collection instead of the field library
    #[arg(long, conflicts_with = "field")]
    collection: Option<String>,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: PatternsArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.collection {
        let name: CollectionName = name.parse()?;
        return show_collection(name, args.json);
    }

    let fields: Vec<SemanticField> = match &args.field {
        Some(name) => vec![name.parse().map_err(anyhow::Error::msg)?],
        None => SemanticField::ALL.to_vec(),
    };

    if args.json {
        let entries: Vec<_> = fields
            .iter()
            .map(|f| {
                json!({
                    "field": f,
                    "key": f.key(),
                    "comprehensive": f.comprehensive(),
                    "variants": f.variants(),
                })
            })
            .collect();
        let doc = json!({ "version": LIBRARY_VERSION, "fields": entries });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    for field in fields {
        println!("{} ({})", style(field.label()).bold(), field.key());
        for variant in field.variants() {
            println!("  {:<16} {}", variant.name, variant.source);
        }
        println!();
    }

    Ok(())
}

fn show_collection(name: CollectionName, as_json: bool) -> anyhow::Result<()> {
    let rules = collection(name).materialize();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{}", style(name).bold());
    for rule in &rules {
        let required = if rule.required { "required" } else { "optional" };
        println!(
            "  {:<12} {:<7} {:<9} {}",
            rule.key, rule.value_type, required, rule.pattern
        );
    }

    Ok(())
}
