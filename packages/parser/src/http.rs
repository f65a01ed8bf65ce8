//! Feed download over HTTP.
//!
//! Every request advertises the feed media types in `Accept`. Server errors,
//! `429 Too Many Requests` and dropped connections are retried with
//! exponential backoff. A conditional request answered with
//! `304 Not Modified` yields [`Fetched::Unchanged`].

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ETAG, IF_MODIFIED_SINCE,
    IF_NONE_MATCH, LAST_MODIFIED,
};
use reqwest::StatusCode;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{FeedError, Result};

/// User agent string identifying this tool.
const USER_AGENT: &str = concat!("rapidfeed/", env!("CARGO_PKG_VERSION"));

/// `Accept` header sent with every request: feed types first, generic XML
/// next, anything else last.
pub const FEED_ACCEPT: &str = "application/rss+xml, application/atom+xml, \
application/rdf+xml;q=0.9, application/xml;q=0.8, text/xml;q=0.8, */*;q=0.1";

/// Maximum number of attempts for transient failures.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Cache validators of a previously downloaded feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl Validators {
    fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        Self {
            etag: header(ETAG),
            last_modified: header(LAST_MODIFIED),
        }
    }

    fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(etag) = &self.etag {
            request = request.header(IF_NONE_MATCH, etag);
        }
        if let Some(modified) = &self.last_modified {
            request = request.header(IF_MODIFIED_SINCE, modified);
        }
        request
    }
}

/// A downloaded feed body with the response metadata worth keeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    /// Final URL after redirects.
    pub url: String,
    pub content_type: Option<String>,
    pub validators: Validators,
    pub body: Vec<u8>,
}

/// Result of a feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Updated(FeedResponse),
    /// `304 Not Modified`: the caller's copy is current.
    Unchanged,
}

enum Attempt {
    Done(Fetched),
    Retry(String),
}

/// Create an HTTP client that identifies itself and asks for feed types.
pub fn create_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));

    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Request a feed, conditionally when `validators` are given.
///
/// Client errors other than 429 and malformed URLs fail immediately.
pub fn fetch_feed(client: &Client, url: &str, validators: Option<&Validators>) -> Result<Fetched> {
    let mut last_error = None;

    for attempt in 1..=MAX_RETRIES {
        if attempt > 1 {
            // 500ms, 1000ms, ...
            let delay = RETRY_BASE_DELAY_MS << (attempt - 2);
            tracing::debug!(url, attempt, delay_ms = delay, "retrying feed request");
            thread::sleep(Duration::from_millis(delay));
        }

        match request_once(client, url, validators)? {
            Attempt::Done(fetched) => return Ok(fetched),
            Attempt::Retry(reason) => {
                tracing::warn!(
                    url,
                    reason = %reason,
                    attempt,
                    max_retries = MAX_RETRIES,
                    "transient failure"
                );
                last_error = Some(reason);
            }
        }
    }

    Err(FeedError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

/// Download a feed body unconditionally.
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    match fetch_feed(client, url, None)? {
        Fetched::Updated(response) => Ok(response.body),
        Fetched::Unchanged => Err(FeedError::NotModified(url.to_string())),
    }
}

fn request_once(client: &Client, url: &str, validators: Option<&Validators>) -> Result<Attempt> {
    let mut request = client.get(url);
    if let Some(validators) = validators {
        request = validators.apply(request);
    }

    let response = match request.send() {
        Ok(response) => response,
        Err(e) if e.is_connect() || e.is_timeout() => return Ok(Attempt::Retry(e.to_string())),
        Err(e) => return Err(FeedError::Http(e)),
    };

    let status = response.status();
    if status == StatusCode::NOT_MODIFIED {
        tracing::debug!(url, "feed not modified");
        return Ok(Attempt::Done(Fetched::Unchanged));
    }
    if is_transient(status) {
        return Ok(Attempt::Retry(format!("Server responded {status}")));
    }

    let response = response.error_for_status()?;
    Ok(Attempt::Done(Fetched::Updated(read_feed(response)?)))
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn read_feed(response: Response) -> Result<FeedResponse> {
    let url = response.url().to_string();
    let headers = response.headers();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let validators = Validators::from_headers(headers);
    let body = response.bytes()?.to_vec();

    Ok(FeedResponse {
        url,
        content_type,
        validators,
        body,
    })
}
