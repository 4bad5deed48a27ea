//! Generate command - build a pattern from a selected substring.

use clap::Args;

use sigparse_core::{generate_rule, suggest_field};

use super::extract::read_input;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Message file, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// The selected value, as it appears in the message
    #[arg(short, long)]
    selection: String,

    /// Print a complete field rule as JSON instead of the bare pattern
    #[arg(long)]
    field: bool,
}

pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;

    if !text.contains(&args.selection) {
        tracing::warn!("Selection {:?} does not occur in the message", args.selection);
    }

    if args.field {
        let rule = suggest_field(&text, &args.selection);
        println!("{}", serde_json::to_string_pretty(&rule)?);
    } else {
        println!("{}", generate_rule(&text, &args.selection));
    }

    Ok(())
}
