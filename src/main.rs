use std::io::{self, Write};
use std::{path::PathBuf, process};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use comment_keywords::lemmatizer::DictionaryLemmatizer;
use comment_keywords::loader::load_comments;
use comment_keywords::logging::init_logging;
use comment_keywords::report::KeywordReport;
use comment_keywords::tagger::HmmTagger;
use comment_keywords::{Config, KeywordExtractor};

#[derive(Parser, Debug)]
#[command(version, about = "Rank the noun phrases that dominate a set of Persian comments", long_about = None)]
struct Args {
    #[clap(help = "Comments table (CSV or XLSX). Defaults to the configured input file in the data directory")]
    input: Option<PathBuf>,
    #[clap(short, long, help = "Config file (default ./config.toml)")]
    config: Option<PathBuf>,
    #[clap(long, help = "Column holding the comment text")]
    column: Option<String>,
    #[clap(short = 'n', long, help = "Number of phrases to report")]
    top_n: Option<usize>,
    #[clap(long, help = "Vocabulary size cap")]
    max_features: Option<usize>,
    #[clap(long, help = "Print the report as JSON")]
    json: bool,
    #[clap(short, long, help = "Log every dropped token")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref());
    if let Some(column) = args.column {
        config.text_column = column;
    }
    if let Some(top_n) = args.top_n {
        config.extraction.top_n = top_n;
    }
    if let Some(max_features) = args.max_features {
        config.extraction.max_features = max_features;
    }

    let input = args.input.unwrap_or_else(|| config.data_file(&config.extraction.input_file));
    info!("Input: {}", input.display());

    let comments = load_comments(&input, &config.text_column)
        .with_context(|| format!("failed to load comments from {}", input.display()))?;

    let resources = &config.resources;
    let tagger = HmmTagger::load(&config.data_file(&resources.tagger_model))
        .context("failed to load POS tagger")?;
    let lemmatizer = DictionaryLemmatizer::load(
        &config.data_file(&resources.words),
        &config.data_file(&resources.verbs),
    ).context("failed to load lemmatizer lexicon")?;

    let extractor = KeywordExtractor::new(&config, &tagger, &lemmatizer);
    let ranking = extractor.run(comments);
    let report = KeywordReport::new(&ranking, config.extraction.top_n);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        report.write_json(&mut out)?;
    } else {
        report.write_text(&mut out)?;
    }
    out.flush()?;

    Ok(())
}
