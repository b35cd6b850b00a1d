//! Brave search adapter (GET + query parameters wire contract).

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{SearchError, body_snippet};
use crate::search::SearchHit;

const BACKEND: &str = "brave";

/// Thin client for the Brave `/res/v1/web/search` endpoint.
#[derive(Debug, Clone)]
pub struct BraveSearch {
    http: reqwest::Client,
    base: String,
    api_key: String,
}

impl BraveSearch {
    /// Build a client with the given key, base URL and search timeout.
    pub fn new(api_key: &str, base: &str, timeout_secs: f64) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(timeout_secs))
            .build()
            .map_err(|e| SearchError::from_reqwest(BACKEND, e))?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Run one search and normalize the results; non-2xx is an error.
    pub async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>, SearchError> {
        #[derive(Deserialize)]
        struct Resp {
            web: Option<Web>,
        }
        #[derive(Deserialize)]
        struct Web {
            results: Option<Vec<Item>>,
        }
        #[derive(Deserialize)]
        struct Item {
            title: Option<String>,
            url: Option<String>,
            description: Option<String>,
        }

        let url = format!("{}/res/v1/web/search", self.base);
        debug!(%query, count, "GET {url}");

        let resp = self
            .http
            .get(&url)
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", &count.to_string())])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(BACKEND, e))?;

        let status = resp.status();
        if !status.is_success() {
            let snippet = body_snippet(&resp.text().await.unwrap_or_default());
            return Err(SearchError::HttpStatus {
                backend: BACKEND,
                status: status.as_u16(),
                snippet,
            });
        }

        let data: Resp = resp.json().await.map_err(|e| SearchError::Decode {
            backend: BACKEND,
            message: e.to_string(),
        })?;

        let items = data.web.and_then(|w| w.results).unwrap_or_default();
        Ok(items
            .into_iter()
            .filter_map(|it| {
                let url = it.url?;
                Some(SearchHit {
                    title: it.title.unwrap_or_else(|| "Untitled".to_string()),
                    url,
                    snippet: it.description,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_token_header_and_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .and(header("X-Subscription-Token", "bk"))
            .and(query_param("q", "grid layouts"))
            .and(query_param("count", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "web": {
                    "results": [
                        {"title": "B", "url": "https://b.dev/z", "description": "beta"},
                        {"description": "urlless"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = BraveSearch::new("bk", &server.uri(), 5.0).unwrap();
        let hits = client.search("grid layouts", 8).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://b.dev/z");
        assert_eq!(hits[0].snippet.as_deref(), Some("beta"));
    }

    #[tokio::test]
    async fn missing_web_section_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = BraveSearch::new("bk", &server.uri(), 5.0).unwrap();
        assert!(client.search("q", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_2xx_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = BraveSearch::new("bk", &server.uri(), 5.0).unwrap();
        let err = client.search("q", 2).await.unwrap_err();
        assert!(matches!(err, SearchError::HttpStatus { status: 503, .. }));
    }
}
