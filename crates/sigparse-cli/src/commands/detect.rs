//! Detect command - recognise a message format and print a starting template.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use sigparse_core::models::rule::Template;
use sigparse_core::{auto_detect_fields, smart_detect_with_source};

use super::extract::{read_input, source_label};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Message file, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Write the template to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip collection matching and always auto-detect fields
    #[arg(long)]
    auto: bool,
}

pub async fn run(args: DetectArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;

    let (fields, source) = if args.auto {
        (auto_detect_fields(&text), None)
    } else {
        smart_detect_with_source(&text)
    };
    let label = source_label(source);

    eprintln!(
        "{} Format: {} ({} fields)",
        style("ℹ").blue(),
        label,
        fields.len()
    );

    if fields.is_empty() {
        anyhow::bail!("No fields detected in message");
    }

    let mut template = Template::new(fields).with_test_message(text.trim_end());
    template.name = Some(label);
    let json = serde_json::to_string_pretty(&template)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &json)?;
        println!(
            "{} Template written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
