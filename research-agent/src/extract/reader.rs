//! Readable-text and raw-HTML fetching.
//!
//! Text always goes through the reader proxy, which returns the cleaned
//! content of the target page. Raw HTML (for the image heuristic) is fetched
//! directly with a browser user-agent first; access-denied statuses
//! (401/403/429) and transport errors get one retry through the proxy.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

/// Per-URL fetch failure; callers degrade the item, never abort the batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),
}

impl FetchError {
    fn is_access_denied(&self) -> bool {
        matches!(
            self,
            FetchError::Status(
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            )
        )
    }

    fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// Browser-like user agent; some hosts refuse obviously non-browser clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP fetcher shared by the extraction workers.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    http: reqwest::Client,
    reader_base: String,
}

impl ContentFetcher {
    /// Build a fetcher with the content-fetch timeout class.
    pub fn new(reader_base: &str, timeout_secs: f64) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            http,
            reader_base: reader_base.trim_end_matches('/').to_string(),
        })
    }

    fn proxy_url(&self, page_url: &str) -> String {
        format!("{}/{}", self.reader_base, page_url)
    }

    /// Cleaned readable text for `url` via the reader proxy.
    pub async fn fetch_readable_text(&self, url: &str) -> Result<String, FetchError> {
        let proxy = self.proxy_url(url);
        let resp = self.http.get(&proxy).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.text().await?)
    }

    /// Raw page HTML for the image heuristic. Direct fetch first; bot
    /// blocking (401/403/429) and transport errors fall back to one fetch
    /// through the reader proxy. `None` when nothing worked.
    pub async fn fetch_page_html(&self, url: &str) -> Option<String> {
        match self.fetch_html_direct(url).await {
            Ok(body) => Some(body),
            Err(e) if e.is_access_denied() || e.is_transport() => {
                debug!(%url, "direct HTML fetch blocked ({e}), retrying via reader proxy");
                match self.fetch_html_via_proxy(url).await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        warn!(%url, "proxy HTML fetch failed: {e}");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(%url, "direct HTML fetch failed: {e}");
                None
            }
        }
    }

    async fn fetch_html_direct(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.text().await?)
    }

    async fn fetch_html_via_proxy(&self, url: &str) -> Result<String, FetchError> {
        let proxy = self.proxy_url(url);
        let resp = self.http.get(&proxy).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn access_denied_direct_fetch_falls_back_to_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocked"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/http.*blocked$"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&server.uri(), 5.0).unwrap();
        let html = fetcher
            .fetch_page_html(&format!("{}/blocked", server.uri()))
            .await;
        assert_eq!(html.as_deref(), Some("<html></html>"));
    }

    #[tokio::test]
    async fn other_statuses_do_not_hit_the_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        // The proxy would answer, but a 404 is not an access-denied status.
        Mock::given(method("GET"))
            .and(path_regex("^/http.*gone$"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&server.uri(), 5.0).unwrap();
        let html = fetcher.fetch_page_html(&format!("{}/gone", server.uri())).await;
        assert!(html.is_none());
    }

    #[tokio::test]
    async fn readable_text_non_2xx_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&server.uri(), 5.0).unwrap();
        let err = fetcher
            .fetch_readable_text("http://example.com/a")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 502));
    }
}
