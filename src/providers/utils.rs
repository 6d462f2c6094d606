use anyhow::Result;
use serde_json::Value;

use crate::errors::ProviderError;

/// One meaningful line of an OpenAI-compatible server-sent event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Delta(String),
    Done,
}

/// Interpret a single SSE line. Comments, blank lines, non-`data` fields and
/// chunks without content (role headers, finish markers) yield `None`.
pub fn parse_sse_line(line: &str) -> Result<Option<SseEvent>, ProviderError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim_start();

    if data == "[DONE]" {
        return Ok(Some(SseEvent::Done));
    }
    if data.is_empty() {
        return Ok(None);
    }

    let chunk: Value = serde_json::from_str(data)
        .map_err(|e| ProviderError::MalformedChunk(format!("{}: {}", e, data)))?;

    if let Some(err) = api_error(&chunk) {
        return Err(err);
    }

    let delta = chunk["choices"][0]["delta"]["content"]
        .as_str()
        .unwrap_or_default();

    if delta.is_empty() {
        Ok(None)
    } else {
        Ok(Some(SseEvent::Delta(delta.to_string())))
    }
}

/// Extract the assistant text from a non-streamed chat completion response
pub fn openai_response_to_text(response: &Value) -> Result<String, ProviderError> {
    if let Some(err) = api_error(response) {
        return Err(err);
    }

    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(ProviderError::EmptyCompletion)
}

fn api_error(value: &Value) -> Option<ProviderError> {
    let error = value.get("error")?;
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    Some(ProviderError::Api(message))
}
