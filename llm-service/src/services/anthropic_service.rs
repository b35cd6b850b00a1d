//! Anthropic (messages) service for JSON synthesis.
//!
//! Thin client around the Anthropic REST API:
//! - POST {endpoint}/v1/messages — blocking or SSE-streamed message
//!
//! Same constructor validation as the OpenAI service; auth goes through the
//! `x-api-key` header plus a pinned `anthropic-version`.

use std::time::{Duration, Instant};

use futures::StreamExt;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{ConfigError, ProviderError, Result, make_snippet};
use crate::services::sse::SseLineBuffer;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Token cap used when the config carries none; the messages API requires an
/// explicit value.
const FALLBACK_MAX_TOKENS: u32 = 4000;

/// Thin client for the Anthropic messages API.
#[derive(Debug)]
pub struct AnthropicService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_messages: String,
}

impl AnthropicService {
    /// Creates a new [`AnthropicService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not Anthropic
    /// - [`ConfigError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`ConfigError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Anthropic {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let api_key = cfg
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey("Anthropic"))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            header::HeaderValue::from_str(&api_key)
                .map_err(|e| ProviderError::Decode(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(600));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_messages = format!("{}/v1/messages", endpoint.trim_end_matches('/'));

        Ok(Self {
            client,
            cfg,
            url_messages,
        })
    }

    /// Performs a blocking (non-streaming) message request. All text content
    /// blocks of the reply are joined in order.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = MessagesRequest::new(&self.cfg, system, prompt, false);
        debug!(model = %self.cfg.model, prompt_len = prompt.len(), "POST {}", self.url_messages);

        let resp = self
            .client
            .post(&self.url_messages)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::HttpStatus {
                status,
                url: self.url_messages.clone(),
                snippet,
            }
            .into());
        }

        let data: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let text: String = data
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = text.len(),
            "message completion done"
        );
        Ok(text)
    }

    /// Streams a message; `on_fragment` receives `content_block_delta` text
    /// deltas in delivery order. Returns the concatenated full text.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Stream`] if the stream breaks or delivers nothing
    pub async fn stream(
        &self,
        system: &str,
        prompt: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let body = MessagesRequest::new(&self.cfg, system, prompt, true);
        debug!(model = %self.cfg.model, "POST {} (stream)", self.url_messages);

        let resp = self
            .client
            .post(&self.url_messages)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::HttpStatus {
                status,
                url: self.url_messages.clone(),
                snippet,
            }
            .into());
        }

        let mut full = String::new();
        let mut lines = SseLineBuffer::default();
        let mut byte_stream = resp.bytes_stream();
        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|e| ProviderError::Stream(e.to_string()))?;
            for data in lines.push(&chunk) {
                match serde_json::from_str::<StreamEvent>(&data) {
                    Ok(event) => {
                        if event.kind != "content_block_delta" {
                            continue;
                        }
                        if let Some(text) = event.delta.and_then(|d| d.text) {
                            if !text.is_empty() {
                                on_fragment(&text);
                                full.push_str(&text);
                            }
                        }
                    }
                    Err(e) => warn!("skipping undecodable stream event: {e}"),
                }
            }
        }

        if full.is_empty() {
            return Err(ProviderError::Stream("no text fragments received".into()).into());
        }
        Ok(full)
    }
}

/// Request body for `/v1/messages`.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Msg<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    fn new(cfg: &'a LlmModelConfig, system: &'a str, prompt: &'a str, stream: bool) -> Self {
        Self {
            model: &cfg.model,
            max_tokens: cfg.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
            system,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: cfg.temperature,
            stream,
        }
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    delta: Option<StreamDelta>,
}

#[derive(Deserialize)]
struct StreamDelta {
    text: Option<String>,
}
