//! Exa search adapter (POST + JSON body wire contract).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{SearchError, body_snippet};
use crate::search::SearchHit;

const BACKEND: &str = "exa";

/// Thin client for the Exa `/search` endpoint.
#[derive(Debug, Clone)]
pub struct ExaSearch {
    http: reqwest::Client,
    base: String,
    api_key: String,
}

impl ExaSearch {
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

    /// Run one search and normalize the results. Non-2xx responses are
    /// errors, never empty lists: a throttled or unauthenticated backend
    /// must stop the run.
    pub async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        #[derive(Serialize)]
        struct Req<'a> {
            query: &'a str,
            #[serde(rename = "numResults")]
            num_results: usize,
        }
        #[derive(Deserialize)]
        struct Resp {
            results: Option<Vec<Item>>,
            documents: Option<Vec<Item>>,
        }
        #[derive(Deserialize)]
        struct Item {
            title: Option<String>,
            id: Option<String>,
            url: Option<String>,
            link: Option<String>,
            text: Option<String>,
            snippet: Option<String>,
        }

        let url = format!("{}/search", self.base);
        debug!(%query, num_results, "POST {url}");

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&Req { query, num_results })
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

        let items = data.results.or(data.documents).unwrap_or_default();
        Ok(items
            .into_iter()
            .filter_map(|it| {
                let url = it.url.or(it.link)?;
                Some(SearchHit {
                    title: it.title.or(it.id).unwrap_or_else(|| "Untitled".to_string()),
                    url,
                    snippet: it.text.or(it.snippet),
                })
            })
            .collect())
    }
}
