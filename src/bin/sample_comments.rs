use std::{path::PathBuf, process};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use comment_keywords::labeling::sample_for_labeling;
use comment_keywords::logging::init_logging;
use comment_keywords::table::Table;
use comment_keywords::Config;

/// Picks a fixed, seeded sample of comments for manual labeling and writes
/// the remaining comments to a separate file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[clap(short, long, help = "Config file (default ./config.toml)")]
    config: Option<PathBuf>,
    #[clap(short, long, help = "Raw comments table (CSV or XLSX)")]
    input: Option<PathBuf>,
    #[clap(short, long, help = "Number of comments to sample")]
    size: Option<usize>,
    #[clap(long, help = "Random seed")]
    seed: Option<u64>,
    #[clap(long, help = "Column holding the comment text")]
    column: Option<String>,
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
    let labeling = &config.labeling;

    let input = args.input.unwrap_or_else(|| config.data_file(&labeling.raw_file));
    let column = args.column.as_deref().unwrap_or(&config.text_column);
    let size = args.size.unwrap_or(labeling.sample_size);
    let seed = args.seed.unwrap_or(labeling.seed);

    info!("Sampling {} comments from {} (seed {})", size, input.display(), seed);

    let table = Table::read(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let sample = sample_for_labeling(&table, column, size, seed, &input)?;

    let sample_path = config.data_file(&labeling.sample_file);
    sample.sampled.write(&sample_path, true)?;
    info!("Sample file: {}", sample_path.display());

    let remainder_path = config.data_file(&labeling.remainder_file);
    sample.remainder.write(&remainder_path, false)?;
    info!("Remaining comments: {}", remainder_path.display());

    Ok(())
}
