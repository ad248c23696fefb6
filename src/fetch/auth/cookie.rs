use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderValue};

/// An [`HttpClient`] wrapper that sends the portal's login session as a
/// `Cookie` header, e.g. `PHPSESSID=abc123`.
///
/// The results page is only served to a logged-in student, so fetching it
/// outside the browser needs the browser's session cookie.
pub struct SessionCookie<C> {
    pub inner: C,
    cookie: HeaderValue,
}

impl<C> SessionCookie<C> {
    /// Fails if `cookie` contains characters that cannot appear in a header.
    pub fn new(inner: C, cookie: &str) -> Result<Self, reqwest::header::InvalidHeaderValue> {
        let mut cookie = HeaderValue::from_str(cookie.trim())?;
        cookie.set_sensitive(true);
        Ok(Self { inner, cookie })
    }

    fn apply(&self, req: &mut reqwest::Request) {
        req.headers_mut().insert(COOKIE, self.cookie.clone());
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for SessionCookie<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.apply(&mut req);
        self.inner.execute(req).await
    }
}
