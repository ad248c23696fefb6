//! Sources of raw result rows.
//!
//! The rater never cares where rows come from: a saved results page, the
//! live page fetched with a session cookie, or a CSV dump of the table.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::RESULTS_PAGE_MARKER;
use crate::error::{CgpaError, Result};
use crate::fetch::{BasicClient, HttpClient, SessionCookie, fetch_text};
use crate::parser::parse_result_rows;

/// Abstraction over a provider of results-table rows.
#[async_trait::async_trait]
pub trait RowSource: Send + Sync {
    /// Returns the current rows, one `Vec` of cell texts per table row.
    async fn rows(&self) -> Result<Vec<Vec<String>>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// A results page saved to disk.
pub struct HtmlFileSource {
    pub path: PathBuf,
}

#[async_trait::async_trait]
impl RowSource for HtmlFileSource {
    async fn rows(&self) -> Result<Vec<Vec<String>>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            CgpaError::Source(format!("failed to read {}: {e}", self.path.display()))
        })?;
        // Portals are not always careful about encodings.
        let html = String::from_utf8_lossy(&bytes);
        let rows = parse_result_rows(&html);
        debug!(path = %self.path.display(), rows = rows.len(), "Parsed results page");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// The live results page.
pub struct HtmlUrlSource {
    url: String,
    client: Box<dyn HttpClient>,
}

impl HtmlUrlSource {
    /// Builds a source for `url`, sending `session_cookie` if given.
    ///
    /// Unless `allow_any_page` is set, the URL must point at the published
    /// results page; anything else would scrape unrelated tables.
    pub fn new(url: &str, session_cookie: Option<&str>, allow_any_page: bool) -> Result<Self> {
        if !allow_any_page && !is_results_page(url) {
            return Err(CgpaError::Source(format!(
                "'{url}' is not the results page ({RESULTS_PAGE_MARKER}); navigate to it first"
            )));
        }

        let basic = BasicClient::new()?;
        let client: Box<dyn HttpClient> = match session_cookie {
            Some(cookie) => Box::new(
                SessionCookie::new(basic, cookie)
                    .map_err(|e| CgpaError::InvalidInput(format!("invalid session cookie: {e}")))?,
            ),
            None => Box::new(basic),
        };

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

pub fn is_results_page(url: &str) -> bool {
    url.contains(RESULTS_PAGE_MARKER)
}

#[async_trait::async_trait]
impl RowSource for HtmlUrlSource {
    async fn rows(&self) -> Result<Vec<Vec<String>>> {
        info!(url = %self.url, "Fetching results page");
        let html = fetch_text(self.client.as_ref(), &self.url).await?;
        let rows = parse_result_rows(&html);
        debug!(rows = rows.len(), "Parsed results page");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A headerless CSV file with one results-table row per record.
pub struct CsvRowSource {
    pub path: PathBuf,
}

#[async_trait::async_trait]
impl RowSource for CsvRowSource {
    async fn rows(&self) -> Result<Vec<Vec<String>>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_csv_rows(&path))
            .await
            .map_err(|e| CgpaError::Source(format!("CSV reader task failed: {e}")))?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn read_csv_rows(path: &std::path::Path) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Rows handed over directly, e.g. by an embedding application.
pub struct StaticRowSource(pub Vec<Vec<String>>);

#[async_trait::async_trait]
impl RowSource for StaticRowSource {
    async fn rows(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory rows", self.0.len())
    }
}
