//! Command-line interface.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::bench::run_bench;
use crate::config::{ParseOptions, DEFAULT_FETCH_LIMIT, DEFAULT_JOBS};
use crate::error::{FeedError, Result};
use crate::fetch::{fetch_urls, read_url_list};
use crate::http::create_client;
use crate::parser::parse_bytes;
use crate::sanitize::SanitizePolicy;

/// RapidFeed - parse RSS, RDF and Atom feeds.
#[derive(Parser)]
#[command(name = "rapidfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse feed files and print them as JSON.
    Parse {
        /// Feed files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Keep embedded HTML as-is
        #[arg(long)]
        no_sanitize: bool,

        /// Emit dates as epoch seconds
        #[arg(long)]
        unix_timestamps: bool,

        /// Print one JSON document per line
        #[arg(long)]
        compact: bool,
    },

    /// Measure parse throughput over a directory of feed files.
    Bench {
        /// Directory containing feed files
        dir: PathBuf,

        /// Parse at most this many files
        #[arg(short, long)]
        limit: Option<usize>,

        /// Number of worker threads
        #[arg(short, long, default_value_t = DEFAULT_JOBS)]
        jobs: usize,

        /// Skip HTML sanitization
        #[arg(long)]
        no_sanitize: bool,
    },

    /// Download feeds listed in a file, one URL per line.
    Fetch {
        /// File with newline-delimited URLs
        url_list: PathBuf,

        /// Output directory (default: feeds/)
        #[arg(short, long, default_value = "feeds")]
        output: PathBuf,

        /// Download at most this many URLs
        #[arg(short, long, default_value_t = DEFAULT_FETCH_LIMIT)]
        max: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            files,
            no_sanitize,
            unix_timestamps,
            compact,
        } => parse_command(&files, &parse_options(no_sanitize, unix_timestamps), compact),
        Commands::Bench {
            dir,
            limit,
            jobs,
            no_sanitize,
        } => bench_command(&dir, limit, jobs, &parse_options(no_sanitize, false)),
        Commands::Fetch {
            url_list,
            output,
            max,
        } => fetch_command(&url_list, &output, max),
    }
}

/// Map command-line flags onto parse options.
#[must_use]
pub fn parse_options(no_sanitize: bool, unix_timestamps: bool) -> ParseOptions {
    let sanitize = if no_sanitize {
        SanitizePolicy::None
    } else {
        SanitizePolicy::Default
    };
    ParseOptions::new()
        .with_sanitize(sanitize)
        .with_unix_timestamps(unix_timestamps)
}

fn parse_command(files: &[PathBuf], options: &ParseOptions, compact: bool) -> Result<()> {
    for path in files {
        let bytes = std::fs::read(path)?;
        let parsed = parse_bytes(&bytes, options);
        if parsed.bozo {
            tracing::warn!(file = %path.display(), "document could not be parsed cleanly");
        }

        let json = if compact {
            serde_json::to_string(&parsed)?
        } else {
            serde_json::to_string_pretty(&parsed)?
        };
        println!("{json}");
    }
    Ok(())
}

fn bench_command(dir: &Path, limit: Option<usize>, jobs: usize, options: &ParseOptions) -> Result<()> {
    if !dir.is_dir() {
        return Err(FeedError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Not a directory: {}", dir.display()),
        )));
    }

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Parsing feeds with {jobs} workers..."));
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = run_bench(dir, limit, jobs, options);
    pb.finish_and_clear();
    let report = report?;

    println!(
        "{} {} feeds in {:.2}s",
        style("Processed").bold(),
        style(report.files).cyan(),
        report.elapsed_secs
    );
    println!("  Entries: {}", report.entries);
    if report.bozo > 0 {
        println!("  Bozo: {}", style(report.bozo).yellow().bold());
    } else {
        println!("  Bozo: {}", style(report.bozo).green());
    }
    println!("  Bytes: {}", report.bytes);
    println!(
        "  Throughput: {} feeds/sec, {:.0} bytes/sec",
        style(format!("{:.2}", report.feeds_per_sec())).green(),
        report.bytes_per_sec()
    );

    Ok(())
}

fn fetch_command(url_list: &Path, output: &Path, max: usize) -> Result<()> {
    let urls = read_url_list(url_list, max)?;
    let client = create_client()?;

    println!(
        "{} {} feeds into {}",
        style("Downloading").bold(),
        style(urls.len()).cyan(),
        style(output.display()).green()
    );

    let pb = ProgressBar::new(urls.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let report = fetch_urls(&client, &urls, output, |url, _| {
        pb.set_message(url.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = report?;

    println!(
        "{} of {} succeeded",
        style(report.succeeded()).green().bold(),
        report.requested
    );
    for failure in &report.failures {
        println!("  {} {}: {}", style("failed").red(), failure.url, failure.error);
    }

    Ok(())
}
