use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use bio_contact::ResolverConfig;
use bio_contact::db::{Catalog, PdbStore, ProteinIndex};
use bio_contact::io::residues::{self, ResidueQuery};
use bio_contact::ops::{BatchSummary, Error as ResolveError, Resolver};

pub mod interfaces;
pub mod map;
pub mod neighbours;

/// Data sources and settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct DataParameters {
    pub sequences: PathBuf,
    pub identifiers: Option<PathBuf>,
    pub proteins_catalog: Option<PathBuf>,
    pub interactions_catalog: Option<PathBuf>,
    pub structures: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Initializes the logger; each `-v` raises the default level one step above `warn`.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Sizes the global worker pool; without the `parallel` feature the request is ignored.
pub fn configure_threads(threads: Option<usize>) -> Result<()> {
    let Some(threads) = threads else {
        return Ok(());
    };
    if threads == 0 {
        bail!("--threads must be at least 1");
    }

    #[cfg(feature = "parallel")]
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to configure the worker pool")?;

    #[cfg(not(feature = "parallel"))]
    log::warn!("Built without parallel support; ignoring --threads {}", threads);

    Ok(())
}

/// Loads the resolver settings, applying the TOML file when one is given.
pub fn load_config(params: &DataParameters) -> Result<ResolverConfig> {
    match &params.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}

/// Loads every data source and assembles a resolver around them.
pub fn build_resolver(params: &DataParameters, config: ResolverConfig) -> Result<Resolver> {
    run_with_spinner("Loading data sources", || {
        let proteins = ProteinIndex::load(&params.sequences, params.identifiers.as_deref())
            .context("Failed to load protein sequences")?;
        if proteins.is_empty() {
            bail!("No sequences found in {}", params.sequences.display());
        }
        let catalog = Arc::new(
            Catalog::load(
                params.proteins_catalog.as_deref(),
                params.interactions_catalog.as_deref(),
            )
            .context("Failed to load structure catalogs")?,
        );

        Ok(
            Resolver::builder(Arc::new(proteins), Arc::new(PdbStore::new(&params.structures)))
                .structure_catalog(catalog.clone())
                .interaction_catalog(catalog)
                .config(config)
                .build(),
        )
    })
}

/// Reads residue queries from `path`, or from stdin when no path is given.
pub fn load_queries(path: Option<&Path>) -> Result<Vec<ResidueQuery>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open residue file {}", path.display()))?;
            residues::read(BufReader::new(file))
                .with_context(|| format!("Failed to parse residues from {}", path.display()))
        }
        None => {
            let stdin = stdio::stdin();
            if stdin.is_terminal() {
                bail!(
                    "No --residues provided and stdin is a TTY. Provide -r/--residues or pipe residues into biocontact."
                );
            }
            residues::read(stdin.lock()).context("Failed to parse residues from stdin")
        }
    }
}

/// Runs `write` against the configured output file, or stdout when none was given.
pub fn write_output<F>(output: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            writer.flush().context("Failed to flush output writer")?;
        }
        None => {
            let stdout = stdio::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write(&mut writer).context("Failed to write output to stdout")?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Progress bar over `len` proteins, hidden when stderr is not a terminal.
pub fn batch_progress(len: usize, message: &str) -> ProgressBar {
    if !stdio::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar.set_message(message.to_string());
    bar
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Prints per-protein failures and the batch totals to stderr.
pub fn report_summary(summary: &BatchSummary, failures: &[(String, ResolveError)]) {
    for (protein, error) in failures {
        eprintln!("failed: {}: {}", protein, error);
    }
    eprintln!(
        "{} proteins: {} resolved, {} failed, {} skipped",
        summary.total(),
        summary.resolved,
        summary.failed,
        summary.skipped
    );
}

/// Returns true when stdout is a TTY and no explicit output file was supplied.
pub fn interactive_stdout_requested(params: &DataParameters) -> bool {
    params.output.is_none() && stdio::stdout().is_terminal()
}
