//! `rechapter`: regroup page archives into one archive per chapter.

mod error;
mod progress;

use crate::error::{ErrorKind, Result};
use crate::progress::BarProgress;
use clap::{ArgAction, Parser};
use exn::ResultExt;
use rechapter_archive::cli::Preference;
use rechapter_config::Config;
use rechapter_extract::FormatSpec;
use rechapter_library::{FileJournal, NameGenerator, Reorganizer, RunReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status when at least one input could not be reorganized.
const EXIT_FAILED_INPUTS: u8 = 1;
/// Exit status when the run could not start.
const EXIT_SETUP: u8 = 2;

/// Regroup page archives into one archive per chapter, reading volume,
/// chapter and page numbers from each page's filename.
#[derive(Debug, Parser)]
#[command(name = "rechapter", version, about)]
struct Args {
    /// An archive, or a directory of archives
    source: PathBuf,
    /// How page filenames are laid out, e.g.
    /// `[scanner]|loopVol|[volume]|loopCh|[chapter]|loopPg|[page]|[name]`
    format: String,
    /// Output directory; deleted and recreated on every run
    destination: Option<PathBuf>,
    /// Additional configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Session journal, overwritten on every run
    #[arg(long, value_name = "FILE")]
    journal: Option<PathBuf>,
    /// Store pages (`stored`) or compress them (`deflate`)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, require_equals = true)]
    compression: Option<Option<String>>,
    /// Show more log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(args) {
        Ok(report) => {
            print_summary(&report);
            match report.failed() {
                true => ExitCode::from(EXIT_FAILED_INPUTS),
                false => ExitCode::SUCCESS,
            }
        },
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::from(EXIT_SETUP)
        },
    }
}

fn run(args: Args) -> Result<RunReport> {
    let config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let preference = Preference::try_from(args.compression).or_raise(|| ErrorKind::Compression)?;
    let names = NameGenerator::new(config.template.as_deref()).or_raise(|| ErrorKind::Template)?;
    let destination = args.destination.unwrap_or(config.destination);
    let journal_path = args.journal.unwrap_or(config.journal);
    ensure_outside(&journal_path, &destination)?;
    let mut journal = FileJournal::create(&journal_path).or_raise(|| ErrorKind::Journal)?;
    tracing::debug!(journal = %journal_path.display(), "Opened session journal");

    let spec = FormatSpec::new(&args.format);
    let mut reorganizer = Reorganizer::new(names, &mut journal)
        .with_compression(preference.resolve(config.compression))
        .with_scratch(config.scratch)
        .with_progress(BarProgress::stderr());
    reorganizer.run(&args.source, &spec, &destination).or_raise(|| ErrorKind::Run)
}

/// Refuses a journal that would be deleted when the destination is reset.
fn ensure_outside(journal: &Path, destination: &Path) -> Result<()> {
    let parent = journal.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."));
    if let (Ok(parent), Ok(destination)) = (parent.canonicalize(), destination.canonicalize())
        && parent.starts_with(&destination)
    {
        exn::bail!(ErrorKind::JournalInDestination(journal.to_path_buf()));
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level(verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn print_summary(report: &RunReport) {
    for archive in &report.archives {
        println!("{}: {} pages in {} chapters", archive.source.display(), archive.pages, archive.chapters.len());
        for missing in &archive.missing {
            println!("  missing: {}", missing.display());
        }
        for duplicate in &archive.duplicates {
            println!("  duplicate, skipped: {}", duplicate.display());
        }
    }
    for skipped in &report.skipped {
        println!("{}: skipped, not an archive", skipped.display());
    }
    for failure in &report.failures {
        println!("{}: FAILED: {}", failure.path.display(), failure.kind());
    }
}
