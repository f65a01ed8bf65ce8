//! Batch feed downloader.
//!
//! Reads a newline-delimited URL list and stores each response body as a
//! numbered file (`0001.dat`, `0002.dat`, ...). An `index.json` next to the
//! files maps every written file name to its URL.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::error::Result;
use crate::http::{create_client, download_bytes};

/// Name of the file mapping downloaded files to their URLs.
pub const INDEX_FILE: &str = "index.json";

/// A URL that could not be downloaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of a batch download.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchReport {
    pub requested: usize,
    /// File name to source URL, for every successful download.
    pub files: BTreeMap<String, String>,
    pub failures: Vec<FetchFailure>,
}

impl FetchReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.files.len()
    }
}

/// Numbered output file name for the `index`-th URL (zero-based).
#[must_use]
pub fn file_name(index: usize) -> String {
    format!("{:04}.dat", index + 1)
}

/// Read up to `max` URLs from a newline-delimited list, skipping blank lines.
pub fn read_url_list(path: &Path, max: usize) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(String::from)
        .collect())
}

/// Download the first `max` URLs of a list into `output_dir`.
pub fn fetch_all(url_list: &Path, output_dir: &Path, max: usize) -> Result<FetchReport> {
    let urls = read_url_list(url_list, max)?;
    let client = create_client()?;
    fetch_urls(&client, &urls, output_dir, |_, _| {})
}

/// Download `urls` into `output_dir`, calling `on_result` after each one.
///
/// Failed downloads are recorded in the report and do not stop the batch;
/// only filesystem errors abort it.
pub fn fetch_urls(
    client: &Client,
    urls: &[String],
    output_dir: &Path,
    mut on_result: impl FnMut(&str, bool),
) -> Result<FetchReport> {
    fs::create_dir_all(output_dir)?;

    let mut report = FetchReport {
        requested: urls.len(),
        ..FetchReport::default()
    };

    for (index, url) in urls.iter().enumerate() {
        match download_bytes(client, url) {
            Ok(body) => {
                let name = file_name(index);
                fs::write(output_dir.join(&name), &body)?;
                tracing::debug!(url = %url, file = %name, bytes = body.len(), "saved feed");
                report.files.insert(name, url.clone());
                on_result(url, true);
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "download failed");
                report.failures.push(FetchFailure {
                    url: url.clone(),
                    error: e.to_string(),
                });
                on_result(url, false);
            }
        }
    }

    let index = serde_json::to_string_pretty(&report.files)?;
    fs::write(output_dir.join(INDEX_FILE), index)?;

    Ok(report)
}
