use std::time::Duration;

use anyhow::Result;
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tracing::debug;

use super::base::{Provider, TextStream};
use super::utils::{openai_response_to_text, parse_sse_line, SseEvent};
use crate::config::GroqProviderConfig;
use crate::errors::ProviderError;

pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

pub struct GroqProvider {
    client: Client,
    config: GroqProviderConfig,
}

impl GroqProvider {
    pub fn new(config: GroqProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> Result<Response> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );
        let streaming = payload["stream"].as_bool().unwrap_or(false);
        debug!(%url, streaming, "posting chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http { status, body }.into());
        }

        Ok(response)
    }

    fn payload(model: &str, prompt: &str, stream: bool) -> Value {
        json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": prompt
            }],
            "stream": stream
        })
    }
}

#[async_trait]
impl Provider for GroqProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let response: Value = self
            .post(Self::payload(model, prompt, false))
            .await?
            .json()
            .await?;

        Ok(openai_response_to_text(&response)?)
    }

    async fn stream(&self, model: &str, prompt: &str) -> Result<TextStream> {
        let response = self.post(Self::payload(model, prompt, true)).await?;
        let mut bytes = response.bytes_stream();

        let stream: TextStream = Box::pin(try_stream! {
            // Buffer raw bytes so multi-byte characters split across chunks
            // are decoded whole.
            let mut buffer: Vec<u8> = Vec::new();
            let mut done = false;

            while let Some(chunk) = bytes.next().await {
                buffer.extend_from_slice(&chunk?);

                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match parse_sse_line(&String::from_utf8_lossy(&line))? {
                        Some(SseEvent::Delta(text)) => {
                            yield text;
                        }
                        Some(SseEvent::Done) => {
                            done = true;
                            break;
                        }
                        None => {}
                    }
                }

                if done {
                    break;
                }
            }

            if !done && !buffer.is_empty() {
                if let Some(SseEvent::Delta(text)) = parse_sse_line(&String::from_utf8_lossy(&buffer))? {
                    yield text;
                }
            }
            debug!("stream finished");
        });

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn sse_body(deltas: &[&str]) -> String {
        let mut body = String::from(
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
        );
        for delta in deltas {
            let chunk = json!({"choices": [{"index": 0, "delta": {"content": delta}}]});
            body.push_str(&format!("data: {}\n\n", chunk));
        }
        body.push_str("data: {\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n");
        body.push_str("data: [DONE]\n\n");
        body
    }

    fn provider_for(server: &mockito::ServerGuard) -> GroqProvider {
        GroqProvider::new(GroqProviderConfig::new(
            "test_api_key".to_string(),
            format!("{}/", server.url()),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_stream_collects_deltas() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test_api_key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "llama-3.3-70b-versatile",
                "stream": true
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(sse_body(&["Tick", " tock, ", "said the clock."]))
            .create_async()
            .await;

        let provider = provider_for(&server);
        let deltas: Vec<String> = provider
            .stream(GROQ_DEFAULT_MODEL, "Write a story.")
            .await?
            .try_collect()
            .await?;

        assert_eq!(deltas, vec!["Tick", " tock, ", "said the clock."]);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_stream_ignores_data_after_done() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: [DONE]\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n";
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let deltas: Vec<String> = provider_for(&server)
            .stream("m", "p")
            .await?
            .try_collect()
            .await?;
        assert_eq!(deltas, vec!["a"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_stream_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
            .create_async()
            .await;

        let err = match provider_for(&server).stream("m", "p").await {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        let err = err.downcast::<ProviderError>().unwrap();
        match err {
            ProviderError::Http { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stream_malformed_chunk_surfaces_as_item_error() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\ndata: {broken\n\n")
            .create_async()
            .await;

        let mut stream = provider_for(&server).stream("m", "p").await?;
        assert_eq!(stream.next().await.unwrap()?, "ok");
        assert!(stream.next().await.unwrap().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_basic() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({"stream": false})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "chatcmpl-123",
                    "object": "chat.completion",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "Chronos AI benchmark"},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 30, "completion_tokens": 4, "total_tokens": 34}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = provider_for(&server)
            .complete(GROQ_DEFAULT_MODEL, "What is the best search query?")
            .await?;
        assert_eq!(text, "Chronos AI benchmark");
        mock.assert_async().await;
        Ok(())
    }
}
