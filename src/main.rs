use std::{env, fmt::Display, io::Write, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use burrows_delta::{
    load_documents,
    stylometry::corpus::config::{DEFAULT_TOKEN_PATTERN, DEFAULT_VOCABULARY_SIZE},
    BurrowsDelta, CorpusConfig, DeltaConfig, VocabularyAlignment,
};
use clap::Parser;
use env_logger::Builder;
use log::info;
use serde::Serialize;

/// Burrows' Delta: stylometric distance between reference and query texts.
///
/// Both directories are searched recursively for `author_-_title.txt` files.
#[derive(Parser, Debug)]
#[command(name = "burrows-delta", version, about)]
struct Cli {
    /// Directory of reference (train) documents
    train_dir: PathBuf,

    /// Directory of query (test) documents
    test_dir: PathBuf,

    /// Number of most frequent tokens used as features
    #[arg(short = 'k', long = "vocabulary-size", default_value_t = DEFAULT_VOCABULARY_SIZE)]
    vocabulary_size: usize,

    /// Token never selected into the vocabulary (repeatable)
    #[arg(long = "exclude", value_name = "WORD")]
    exclude: Vec<String>,

    /// Regex a token must match to enter the vocabulary (searched, add `^...$` to anchor)
    #[arg(long, default_value = DEFAULT_TOKEN_PATTERN)]
    pattern: String,

    /// Compare author profiles instead of single documents
    #[arg(long)]
    author_level: bool,

    /// Let the test corpus select its own vocabulary
    #[arg(long)]
    independent_vocabulary: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print only the closest N rows
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Install env_logger with a level based on `verbosity`, unless RUST_LOG is set
fn init_logger(verbosity: u8) {
    let mut builder = Builder::from_default_env();
    if env::var("RUST_LOG").is_err() {
        let filters = match verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "burrows_delta=debug,info",
            _ => "burrows_delta=trace,info",
        };
        builder.parse_filters(filters);
    }
    builder.init();
}

fn emit<T: Serialize + Display>(out: &mut impl Write, result: &T, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, result).context("could not serialize result")?;
        writeln!(out)?;
    } else {
        write!(out, "{result}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let start = Instant::now();

    let config = CorpusConfig::new()
        .with_vocabulary_size(cli.vocabulary_size)
        .with_excluded_tokens(cli.exclude.iter().map(String::as_str))
        .with_token_pattern(cli.pattern.as_str());

    let train = load_documents(&cli.train_dir)
        .with_context(|| format!("could not load train documents from {}", cli.train_dir.display()))?
        .into_corpus(config.clone())
        .context("invalid train corpus")?;
    let test = load_documents(&cli.test_dir)
        .with_context(|| format!("could not load test documents from {}", cli.test_dir.display()))?
        .into_corpus(config)
        .context("invalid test corpus")?;
    info!("train: {} documents, test: {} documents", train.len(), test.len());

    let alignment = if cli.independent_vocabulary {
        VocabularyAlignment::Independent
    } else {
        VocabularyAlignment::Shared
    };
    let mut engine = BurrowsDelta::new(train)
        .with_test_corpus(test)
        .with_config(DeltaConfig::default().with_alignment(alignment));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.author_level {
        let mut result = engine.author_deltas().context("author delta failed")?;
        if let Some(n) = cli.limit {
            result.truncate(n);
        }
        emit(&mut out, &result, cli.json)?;
    } else {
        let mut result = engine.document_deltas().context("document delta failed")?;
        if let Some(n) = cli.limit {
            result.truncate(n);
        }
        emit(&mut out, &result, cli.json)?;
    }

    info!("finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
