//! Extract command - pull fields out of a single message.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sigparse_core::extract::{missing_required, ExtractionMap, RuleEngine};
use sigparse_core::models::config::SigparseConfig;
use sigparse_core::models::rule::{FieldRule, RuleSet, Template};
use sigparse_core::models::signal::Signal;
use sigparse_core::patterns::{collection, CollectionName};
use sigparse_core::signal::assemble;
use sigparse_core::smart_detect_with_source;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Message file, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Template or rule list JSON file
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Built-in pattern collection (STANDARD, CRYPTO, COMPACT, DETAILED)
    #[arg(long, conflicts_with = "template")]
    collection: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also assemble a trade signal
    #[arg(long)]
    signal: bool,

    /// Fail when required fields are missing
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per field
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Where a message's rules come from.
pub enum RuleChoice {
    /// Rules loaded from a file.
    Template(Vec<FieldRule>),
    /// A fixed built-in collection.
    Collection(CollectionName),
    /// Chosen per message by format detection.
    Detect,
}

/// Accepted shapes of a rule file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFile {
    Template(Template),
    RuleSet(RuleSet),
    Rules(Vec<FieldRule>),
}

impl RuleChoice {
    pub fn from_args(
        template: Option<&Path>,
        collection_name: Option<&str>,
        config: &SigparseConfig,
    ) -> anyhow::Result<Self> {
        if let Some(path) = template {
            let content = fs::read_to_string(path)?;
            let rules = match serde_json::from_str::<RuleFile>(&content)? {
                RuleFile::Template(t) => t.extraction_config,
                RuleFile::RuleSet(r) => r,
                RuleFile::Rules(fields) => RuleSet::new(fields),
            };
            rules.validate()?;
            info!("Loaded {} rules from {}", rules.fields.len(), path.display());
            return Ok(RuleChoice::Template(rules.fields));
        }

        if let Some(name) = collection_name {
            return Ok(RuleChoice::Collection(name.parse()?));
        }

        if config.extraction.smart_detect {
            return Ok(RuleChoice::Detect);
        }

        match config.extraction.default_collection {
            Some(name) => Ok(RuleChoice::Collection(name)),
            None => anyhow::bail!(
                "Smart detect is disabled and no default collection is set. Use --template or --collection."
            ),
        }
    }

    /// Rules for `text`, with a label naming their source.
    pub fn rules_for(&self, text: &str) -> (Vec<FieldRule>, String) {
        match self {
            RuleChoice::Template(rules) => (rules.clone(), "template".to_string()),
            RuleChoice::Collection(name) => (collection(*name).materialize(), name.to_string()),
            RuleChoice::Detect => {
                let (rules, source) = smart_detect_with_source(text);
                (rules, source_label(source))
            }
        }
    }
}

/// Label for rules that came from `source`, or "auto" when detected.
pub fn source_label(source: Option<CollectionName>) -> String {
    source.map_or_else(|| "auto".to_string(), |name| name.to_string())
}

/// Extraction output for one message.
#[derive(Debug, Serialize)]
pub struct Report {
    pub source: String,
    pub fields: ExtractionMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// Run the rules for `text` and optionally assemble a signal.
pub fn build_report(
    text: &str,
    choice: &RuleChoice,
    config: &SigparseConfig,
    with_signal: bool,
) -> anyhow::Result<Report> {
    let (rules, source) = choice.rules_for(text);
    debug!("Extracting {} fields using {}", rules.len(), source);

    let engine = RuleEngine::from_config(&config.extraction);
    let fields = engine.extract(text, &rules);
    let missing = missing_required(&rules, &fields)
        .into_iter()
        .map(|r| r.key.clone())
        .collect();

    let signal = if with_signal {
        Some(assemble(&fields, &config.signal)?)
    } else {
        None
    };

    Ok(Report {
        source,
        fields,
        signal,
        missing,
    })
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SigparseConfig> {
    Ok(match config_path {
        Some(path) => SigparseConfig::from_file(Path::new(path))?,
        None => SigparseConfig::default(),
    })
}

/// Read a message from a file, or stdin for `-`.
pub fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = Path::new(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(path)?)
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let text = read_input(&args.input)?;
    let choice = RuleChoice::from_args(args.template.as_deref(), args.collection.as_deref(), &config)?;

    let report = build_report(&text, &choice, &config, args.signal)?;
    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.validate && !report.missing.is_empty() {
        eprintln!("{}", style("Missing required fields:").yellow());
        for key in &report.missing {
            eprintln!("  - {}", key);
        }
        anyhow::bail!("{} required field(s) missing", report.missing.len());
    }

    Ok(())
}

pub fn format_report(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &Report) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["key", "value", "error", "match_index"])?;

    for (key, result) in &report.fields {
        let value = result.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
        let index = result.match_index.map(|i| i.to_string()).unwrap_or_default();
        wtr.write_record([
            key.as_str(),
            value.as_str(),
            result.error.map_or("", |e| e.as_str()),
            index.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("Rules: {}\n\n", report.source));

    for (key, result) in &report.fields {
        match (&result.value, result.error) {
            (Some(value), _) => output.push_str(&format!("  {}: {}\n", key, value)),
            (None, Some(error)) => output.push_str(&format!("  {}: - ({})\n", key, error)),
            (None, None) => output.push_str(&format!("  {}: -\n", key)),
        }
    }

    if let Some(signal) = &report.signal {
        output.push_str("\nSignal:\n");
        output.push_str(&format!(
            "  {} {} @ {}\n",
            signal.direction, signal.symbol, signal.entry_price
        ));
        if let Some(sl) = &signal.stop_loss {
            output.push_str(&format!("  SL: {}\n", sl.price));
        }
        for tp in &signal.take_profits {
            match tp.risk_reward_ratio {
                Some(rr) => output.push_str(&format!("  {}: {} (R:R {})\n", tp.level, tp.price, rr)),
                None => output.push_str(&format!("  {}: {}\n", tp.level, tp.price)),
            }
        }
        if let Some(tf) = &signal.timeframe {
            output.push_str(&format!("  Timeframe: {}\n", tf));
        }
    }

    output
}
