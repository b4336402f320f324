use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use atlas_align::{
    load_corpus, load_observations, AlignConfig, Aligner, FallbackTable, Fallbacks,
    LoggingConfig,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Align two tokenized versions of a text from a table of word observations.
#[derive(Parser, Debug)]
#[command(name = "atlas-align", version, about, long_about = None)]
struct Args {
    /// YAML configuration file.
    #[arg(short, long, env = "ATLAS_ALIGN_CONFIG")]
    config: PathBuf,
    /// Version A corpus: token CSV (`.csv`) or flat `ref text` lines.
    #[arg(long)]
    corpus_a: PathBuf,
    /// Version B corpus: token CSV (`.csv`) or flat `ref text` lines.
    #[arg(long)]
    corpus_b: PathBuf,
    /// Observation table with `ref`, `a` and `b` columns (CSV, or TSV by extension).
    #[arg(long)]
    observations: PathBuf,
    /// Curated fallback table for version A forms (JSON, CSV or TSV).
    #[arg(long)]
    fallback_a: Option<PathBuf>,
    /// Curated fallback table for version B forms (JSON, CSV or TSV).
    #[arg(long)]
    fallback_b: Option<PathBuf>,
    /// Where to write the alignment document. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write the resolution report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AlignConfig::from_file(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    init_tracing(&config.logging);

    let a = load_corpus(&args.corpus_a, &config.alignment.version_a)
        .with_context(|| format!("loading corpus {}", args.corpus_a.display()))?;
    let b = load_corpus(&args.corpus_b, &config.alignment.version_b)
        .with_context(|| format!("loading corpus {}", args.corpus_b.display()))?;
    let observations = load_observations(&args.observations)?;
    let fallback_a = args.fallback_a.as_deref().map(FallbackTable::load).transpose()?;
    let fallback_b = args.fallback_b.as_deref().map(FallbackTable::load).transpose()?;

    tracing::info!(
        passages_a = a.len(),
        passages_b = b.len(),
        observations = observations.len(),
        fallback_a = fallback_a.as_ref().map_or(0, FallbackTable::len),
        fallback_b = fallback_b.as_ref().map_or(0, FallbackTable::len),
        "inputs loaded"
    );

    let aligner = Aligner::new(config)?;
    let fallbacks = Fallbacks {
        a: fallback_a.as_ref(),
        b: fallback_b.as_ref(),
    };
    let alignment = aligner.align(&a, &b, &observations, fallbacks)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            alignment.document.write_json(&mut writer)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            alignment.document.write_json(&mut stdout)?;
            writeln!(stdout)?;
        }
    }

    alignment.report.log_summary();
    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_string_pretty(&alignment.report)?)
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}

/// Logs go to stderr so the document can be piped from stdout. `RUST_LOG`
/// overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
