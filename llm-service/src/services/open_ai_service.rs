//! OpenAI (chat completions) service for JSON synthesis.
//!
//! Thin client around the OpenAI REST API:
//! - POST {endpoint}/v1/chat/completions — blocking or SSE-streamed chat
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAi`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via the unified types in `error_handler`.

use std::time::{Duration, Instant};

use futures::StreamExt;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{ConfigError, ProviderError, Result, make_snippet};
use crate::services::sse::SseLineBuffer;

/// Thin client for the OpenAI chat-completions API.
///
/// Constructed from a complete [`LlmModelConfig`]; keeps a preconfigured
/// `reqwest::Client` with the timeout and default headers baked in.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not OpenAI
    /// - [`ConfigError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`ConfigError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::OpenAi {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let api_key = cfg
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey("OpenAI"))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| ProviderError::Decode(format!("invalid API key header: {e}")))?,
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

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Performs a blocking (non-streaming) chat completion.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    /// - [`ProviderError::EmptyCompletion`] if no choices are returned
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = ChatRequest::new(&self.cfg, system, prompt, false);
        debug!(model = %self.cfg.model, prompt_len = prompt.len(), "POST {}", self.url_chat);

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::HttpStatus {
                status,
                url: self.url_chat.clone(),
                snippet,
            }
            .into());
        }

        let data: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let text = data
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyCompletion)?
            .message
            .content
            .unwrap_or_default();

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = text.len(),
            "chat completion done"
        );
        Ok(text)
    }

    /// Streams a chat completion; `on_fragment` receives text deltas in
    /// delivery order. Returns the concatenated full text.
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
        let body = ChatRequest::new(&self.cfg, system, prompt, true);
        debug!(model = %self.cfg.model, "POST {} (stream)", self.url_chat);

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::HttpStatus {
                status,
                url: self.url_chat.clone(),
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
                if data == "[DONE]" {
                    continue;
                }
                match serde_json::from_str::<StreamChunk>(&data) {
                    Ok(event) => {
                        let delta = event
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.delta.content);
                        if let Some(text) = delta {
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

/// Request body for `/v1/chat/completions`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> ChatRequest<'a> {
    fn new(cfg: &'a LlmModelConfig, system: &'a str, prompt: &'a str, stream: bool) -> Self {
        Self {
            model: &cfg.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            stream,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: RespMsg,
}

#[derive(Deserialize)]
struct RespMsg {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Deserialize)]
struct Delta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-5-mini".to_string(),
            endpoint,
            api_key: Some("sk-test".to_string()),
            max_tokens: None,
            temperature: Some(1.0),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn constructor_rejects_missing_key_and_bad_endpoint() {
        let mut cfg = test_cfg("https://api.openai.com".to_string());
        cfg.api_key = None;
        assert!(OpenAiService::new(cfg).is_err());

        let cfg = test_cfg("ftp://nope".to_string());
        assert!(OpenAiService::new(cfg).is_err());
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "{\"ok\":true}"}}]
            })))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(test_cfg(server.uri())).unwrap();
        let out = svc.complete("system", "prompt").await.unwrap();
        assert_eq!(out, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn non_2xx_surfaces_status_and_snippet() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(test_cfg(server.uri())).unwrap();
        let err = svc.complete("system", "prompt").await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid key"));
    }

    #[tokio::test]
    async fn stream_concatenates_deltas_in_delivery_order() {
        let server = MockServer::start().await;
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_string(sse))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(test_cfg(server.uri())).unwrap();
        let mut fragments = Vec::new();
        let full = svc
            .stream("system", "prompt", &mut |f| fragments.push(f.to_string()))
            .await
            .unwrap();
        assert_eq!(fragments, vec!["Hel", "lo"]);
        assert_eq!(full, "Hello");
    }

    #[tokio::test]
    async fn stream_with_no_fragments_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not sse at all"))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(test_cfg(server.uri())).unwrap();
        let err = svc.stream("system", "prompt", &mut |_| {}).await.unwrap_err();
        assert!(err.to_string().contains("streaming failed"));
    }
}
