use std::{path::PathBuf, process};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use comment_keywords::logging::init_logging;
use comment_keywords::normalizer::Normalizer;
use comment_keywords::tagger::{read_tagged_corpus, HmmTagger, TaggedSentence, TaggerModel};
use comment_keywords::Config;

/// Trains the POS tagger model from a tagged corpus
/// (`token<TAB>tag` per line, blank line between sentences).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    corpus: PathBuf,
    #[clap(short, long, help = "Config file (default ./config.toml)")]
    config: Option<PathBuf>,
    #[clap(short, long, help = "Model file to write. Defaults to the configured tagger model")]
    output: Option<PathBuf>,
    #[clap(long, help = "Train on the tokens as given, without normalizing them")]
    raw: bool,
    #[clap(short, long)]
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
    let config = Config::load(args.config.as_deref());
    let output = args.output.unwrap_or_else(|| config.data_file(&config.resources.tagger_model));

    let mut sentences = read_tagged_corpus(&args.corpus)
        .with_context(|| format!("failed to read corpus {}", args.corpus.display()))?;
    info!("Read {} tagged sentences from {}", sentences.len(), args.corpus.display());

    // Train on the same character forms the pipeline produces
    if !args.raw {
        let normalizer = Normalizer::new(config.normalizer.clone());
        sentences = sentences.into_iter()
            .map(|sentence| normalize_sentence(&normalizer, sentence))
            .filter(|sentence| !sentence.is_empty())
            .collect();
    }

    let model = TaggerModel::train(&sentences);
    let tagger = HmmTagger::from_model(&model)
        .map_err(anyhow::Error::msg)
        .context("corpus does not yield a usable model")?;

    model.save(&output)?;
    info!(
        "Saved tagger with {} tags and {} known words to {}",
        tagger.tags().len(),
        model.words.len(),
        output.display(),
    );

    Ok(())
}

fn normalize_sentence(normalizer: &Normalizer, sentence: TaggedSentence) -> TaggedSentence {
    sentence.into_iter()
        .map(|(token, tag)| (normalizer.normalize(&token), tag))
        .filter(|(token, _)| !token.is_empty())
        .collect()
}
