mod input;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wordfinder::{
    config::CliOverrides, CancellationToken, FinderConfig, SearchError, SearchOutput, WordFinder,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file layered over the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short = 'j', long, global = true)]
    threads: Option<NonZeroUsize>,

    /// Number of ranked words to report
    #[arg(short = 'n', long, global = true)]
    max_results: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Do not print the highlighted grid
    #[arg(long, global = true)]
    no_highlight: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the built-in sample grid and word list
    Demo,

    /// Load the grid and word stream from files
    Files {
        /// Grid file, one row per line
        #[arg(short = 'm', long, default_value = "matrix.txt")]
        matrix: PathBuf,

        /// Word stream file, one word per line
        #[arg(short = 'w', long, default_value = "wordstream.txt")]
        words: PathBuf,
    },

    /// Enter the grid and word stream on standard input
    Interactive,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = FinderConfig::load_from(cli.config.as_deref())
        .map_err(SearchError::from)
        .context("Failed to load configuration")?
        .merge_with_cli(CliOverrides {
            thread_count: cli.threads,
            max_results: cli.max_results,
            log_level: cli.log_level.clone(),
        });
    config.validate()?;
    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    let (finder, output) = match &cli.command {
        Commands::Demo => {
            let finder = WordFinder::with_config(input::DEFAULT_GRID, config)?;
            let output = run_search(&finder, input::DEFAULT_WORDS)?;
            (finder, output)
        }
        Commands::Files { matrix, words } => {
            let rows = input::load_grid(matrix)?;
            let finder = WordFinder::with_config(&rows, config)?;
            let mut stream = input::stream_words(words)?;
            let output = run_search(&finder, &mut stream)?;
            stream.finish()?;
            (finder, output)
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut reader = stdin.lock();

            prompt("Enter grid rows one by one. Press Enter on an empty line to finish:")?;
            let rows = input::read_block(&mut reader)?;
            let finder = WordFinder::with_config(&rows, config)?;

            prompt("Enter words one by one. Press Enter on an empty line to finish:")?;
            let words = input::read_block(&mut reader)?;
            let output = run_search(&finder, words)?;
            (finder, output)
        }
    };

    if cli.json {
        println!("{}", output.to_json()?);
    } else {
        render::print_results(finder.grid(), &output, !cli.no_highlight);
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt(message: &str) -> Result<()> {
    let mut stderr = io::stderr();
    writeln!(stderr, "{}", message)?;
    stderr.flush()?;
    Ok(())
}

/// Runs one search behind a spinner. The spinner only observes the search.
fn run_search<I, S>(finder: &WordFinder, words: I) -> Result<SearchOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("|/-\\ ")
            .template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Processing words...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = finder.search(Some(words), &CancellationToken::new());

    match &result {
        Ok(_) => spinner.finish_with_message("Processing words... done."),
        Err(_) => spinner.abandon_with_message("Processing words... failed."),
    }
    Ok(result?)
}
