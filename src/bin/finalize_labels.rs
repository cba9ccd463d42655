use std::{path::PathBuf, process};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use comment_keywords::labeling::finalize_labels;
use comment_keywords::logging::init_logging;
use comment_keywords::table::Table;
use comment_keywords::Config;

/// Turns an annotated sheet into the comment column plus integer labels.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[clap(short, long, help = "Config file (default ./config.toml)")]
    config: Option<PathBuf>,
    #[clap(short, long, help = "Annotated comments table (CSV or XLSX)")]
    input: Option<PathBuf>,
    #[clap(short, long, help = "Output table, written as XLSX for .xlsx paths")]
    output: Option<PathBuf>,
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

    let input = args.input.unwrap_or_else(|| config.data_file(&labeling.annotated_file));
    let output = args.output.unwrap_or_else(|| config.data_file(&labeling.labeled_file));
    let column = args.column.as_deref().unwrap_or(&config.text_column);

    let table = Table::read(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let labeled = finalize_labels(&table, column, &labeling.label_columns, &input)?;

    labeled.write(&output, false)?;
    info!("Wrote {} labeled comments to {}", labeled.len(), output.display());

    Ok(())
}
