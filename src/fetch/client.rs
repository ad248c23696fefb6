use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for sending requests, so wrappers can decorate them (see
/// [`SessionCookie`](super::SessionCookie)).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
