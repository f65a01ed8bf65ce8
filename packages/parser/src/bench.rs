//! Parse throughput benchmark over a directory of feed files.
//!
//! Files are loaded up front so that only parsing is timed. Parsing runs on
//! a dedicated rayon pool sized to the requested worker count; all workers
//! share one [`ParseOptions`] value.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::config::{validate_jobs, ParseOptions};
use crate::error::Result;
use crate::parser::parse_bytes;

/// Benchmark results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub files: usize,
    pub bozo: usize,
    pub bytes: usize,
    pub entries: usize,
    pub elapsed_secs: f64,
}

impl BenchReport {
    #[must_use]
    pub fn feeds_per_sec(&self) -> f64 {
        rate(self.files, self.elapsed_secs)
    }

    #[must_use]
    pub fn bytes_per_sec(&self) -> f64 {
        rate(self.bytes, self.elapsed_secs)
    }
}

#[allow(clippy::cast_precision_loss)]
fn rate(count: usize, secs: f64) -> f64 {
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Regular files in `dir`, sorted by name, at most `limit` of them.
pub fn collect_files(dir: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    if let Some(limit) = limit {
        files.truncate(limit);
    }
    Ok(files)
}

/// Parse every file in `dir` on `jobs` worker threads.
pub fn run_bench(
    dir: &Path,
    limit: Option<usize>,
    jobs: usize,
    options: &ParseOptions,
) -> Result<BenchReport> {
    let jobs = validate_jobs(jobs)?;
    let documents = collect_files(dir, limit)?
        .iter()
        .map(fs::read)
        .collect::<std::io::Result<Vec<_>>>()?;
    tracing::debug!(files = documents.len(), jobs, "starting benchmark");

    let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let started = Instant::now();
    let (bozo, entries) = pool.install(|| {
        documents
            .par_iter()
            .map(|bytes| {
                let parsed = parse_bytes(bytes, options);
                (usize::from(parsed.bozo), parsed.entries.len())
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
    });
    let elapsed = started.elapsed();

    Ok(BenchReport {
        files: documents.len(),
        bozo,
        bytes: documents.iter().map(Vec::len).sum(),
        entries,
        elapsed_secs: elapsed.as_secs_f64(),
    })
}
