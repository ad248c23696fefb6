mod basic;
mod client;
pub mod auth;

pub use auth::SessionCookie;
pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{CgpaError, Result};

/// GETs `url` and returns the body as text.
///
/// Non-success statuses are errors; a login redirect that lands on a 200
/// page is not detected here (it simply yields no result rows).
pub async fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<String> {
    let url = url
        .parse()
        .map_err(|e| CgpaError::Source(format!("invalid URL '{url}': {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CgpaError::Source(format!("results page returned HTTP {status}")));
    }
    Ok(resp.text().await?)
}
