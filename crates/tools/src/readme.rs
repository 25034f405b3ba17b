//! Jira CLI README scraping.
//!
//! Fetches the rendered README page for the Jira CLI once, caches the raw
//! response body to a local file, and extracts the lines that look like
//! example `$ jira ...` invocations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::Error;

/// Page the example commands are scraped from.
pub const README_URL: &str = "https://github.com/ankitpokhrel/jira-cli/blob/master/README.md";

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "jira_cli_readme_cache.txt";

/// Sentinel returned when the page has no recognizable README element.
const NOT_FOUND_SENTINEL: &str = "Documentation not found in README";

/// Prefix marking an example CLI invocation in the README text.
const COMMAND_PREFIX: &str = "$ jira";

/// Seam for the single outbound page fetch.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}

/// Fetcher backed by a real HTTP GET.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status));
        }

        Ok(response.text().await?)
    }
}

/// Reads the README from a local cache file, fetching it at most once.
pub struct ReadmeScraper {
    cache_path: PathBuf,
    fetcher: Box<dyn PageFetcher>,
}

impl ReadmeScraper {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            fetcher: Box::new(HttpFetcher::default()),
        }
    }

    pub fn with_fetcher(cache_path: impl Into<PathBuf>, fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            cache_path: cache_path.into(),
            fetcher,
        }
    }

    /// Return the README page content.
    ///
    /// If the cache file exists its content is returned verbatim, however
    /// stale; the cache is never invalidated. Otherwise the page is
    /// fetched, written to the cache file once, and returned. No retry,
    /// no backoff.
    pub async fn readme(&self) -> Result<String, Error> {
        if self.cache_path.exists() {
            debug!(cache = %self.cache_path.display(), "Using cached README");
            return Ok(std::fs::read_to_string(&self.cache_path)?);
        }

        info!(url = README_URL, "Fetching Jira CLI README");
        let body = self.fetcher.fetch(README_URL).await?;

        std::fs::write(&self.cache_path, &body)?;
        debug!(cache = %self.cache_path.display(), bytes = body.len(), "Cached README");

        Ok(body)
    }

    /// Fetch the README and extract its example commands in one step.
    pub async fn example_commands(&self) -> Result<Vec<String>, Error> {
        let html = self.readme().await?;
        Ok(extract_example_commands(&html))
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

/// Extract example Jira CLI invocations from the rendered README HTML.
///
/// Locates the single `article.markdown-body` element, takes its visible
/// text, and keeps the trimmed lines starting with `$ jira`. Returns a
/// one-element sentinel list when the element is absent.
pub fn extract_example_commands(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("article.markdown-body") {
        Ok(s) => s,
        Err(e) => return vec![format!("Error: {e}")],
    };

    let Some(article) = document.select(&selector).next() else {
        return vec![NOT_FOUND_SENTINEL.to_string()];
    };

    // Text nodes concatenate with no separator; only literal newlines in
    // the source split lines, so inline code spans stay inside their
    // sentence instead of becoming lines of their own.
    let text = article.text().collect::<String>();

    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(COMMAND_PREFIX))
        .map(String::from)
        .collect()
}
