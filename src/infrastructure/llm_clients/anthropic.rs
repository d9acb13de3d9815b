use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub struct AnthropicClient {
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config.credential().map(str::to_string).ok_or_else(|| {
            AppError::MissingCredential(
                "Missing Anthropic API key. Set ANTHROPIC_API_KEY environment variable."
                    .to_string(),
            )
        })
    }

    fn messages_url(config: &LLMConfig) -> String {
        format!("{}/messages", config.base_url.trim_end_matches('/'))
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins the `text` blocks of a Messages API reply, in order, one per line.
/// Blocks of any other type are skipped.
pub fn collect_text_blocks(body: &serde_json::Value) -> String {
    body.get("content")
        .and_then(|content| content.as_array())
        .map(|blocks| {
            blocks
                .iter()
                .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
                .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = Self::messages_url(config);

        let body = json!({
            "model": config.model,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
        });

        debug!(url = %url, model = %config.model, prompt_len = prompt.len(), "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &config.anthropic_version)
            .header("content-type", "application/json")
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GenerationRequest(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::GenerationRequest(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::GenerationRequest(format!("Failed to parse JSON: {}", e)))?;

        Ok(collect_text_blocks(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Captured {
        api_key: Option<String>,
        version: Option<String>,
        body: Option<serde_json::Value>,
    }

    fn config_for(base_url: String) -> LLMConfig {
        LLMConfig {
            base_url,
            api_key: Some("sk-test".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Serves `reply` with `status` on `/v1/messages` and records what came in.
    fn spawn_stub(
        status: u16,
        reply: serde_json::Value,
        captured: Arc<Mutex<Captured>>,
    ) -> std::io::Result<String> {
        let server = HttpServer::new(move || {
            let reply = reply.clone();
            let captured = captured.clone();
            App::new().route(
                "/v1/messages",
                web::post().to(move |req: HttpRequest, body: web::Json<serde_json::Value>| {
                    let reply = reply.clone();
                    let captured = captured.clone();
                    async move {
                        let mut seen = captured.lock().unwrap();
                        seen.api_key = req
                            .headers()
                            .get("x-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        seen.version = req
                            .headers()
                            .get("anthropic-version")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        seen.body = Some(body.into_inner());
                        let status = actix_web::http::StatusCode::from_u16(status).unwrap();
                        HttpResponse::build(status).json(reply)
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))?;

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        Ok(format!("http://{}/v1", addr))
    }

    #[test]
    fn test_collect_text_blocks_skips_other_types() {
        let body = json!({
            "content": [
                {"type": "text", "text": "Component: Login"},
                {"type": "tool_use", "id": "x", "name": "noop", "input": {}},
                {"type": "text", "text": "| Test Case ID |"}
            ]
        });
        assert_eq!(collect_text_blocks(&body), "Component: Login\n| Test Case ID |");
    }

    #[test]
    fn test_collect_text_blocks_without_content() {
        assert_eq!(collect_text_blocks(&json!({"id": "msg_1"})), "");
    }

    #[test]
    fn test_messages_url_trims_trailing_slash() {
        let config = config_for("https://api.anthropic.com/v1/".to_string());
        assert_eq!(
            AnthropicClient::messages_url(&config),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let config = LLMConfig {
            // Nothing listens here; reaching the network would give a different error.
            base_url: "http://127.0.0.1:9/v1".to_string(),
            api_key: None,
            ..Default::default()
        };
        let err = AnthropicClient::new().generate(&config, "prompt").await.unwrap_err();
        assert!(matches!(err, AppError::MissingCredential(_)));
    }

    #[actix_web::test]
    async fn test_generate_sends_payload_and_joins_text() {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let reply = json!({
            "content": [
                {"type": "text", "text": "Component: Login"},
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "| Test Case ID | Remarks |"}
            ]
        });
        let base_url = spawn_stub(200, reply, captured.clone()).unwrap();

        let output = AnthropicClient::new()
            .generate(&config_for(base_url), "Generate please")
            .await
            .unwrap();
        assert_eq!(output, "Component: Login\n| Test Case ID | Remarks |");

        let seen = captured.lock().unwrap();
        assert_eq!(seen.api_key.as_deref(), Some("sk-test"));
        assert_eq!(seen.version.as_deref(), Some("2023-06-01"));
        let body = seen.body.as_ref().unwrap();
        assert_eq!(body["model"], "claude-3-7-sonnet-20250219");
        assert_eq!(body["max_tokens"], 8000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Generate please");
    }

    #[actix_web::test]
    async fn test_generate_surfaces_http_status() {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let reply = json!({"type": "error", "error": {"type": "overloaded_error"}});
        let base_url = spawn_stub(529, reply, captured).unwrap();

        let err = AnthropicClient::new()
            .generate(&config_for(base_url), "prompt")
            .await
            .unwrap_err();
        match err {
            AppError::GenerationRequest(msg) => {
                assert!(msg.contains("529"), "unexpected message: {}", msg);
                assert!(msg.contains("overloaded_error"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
