//! OpenAI-compatible API client.
//!
//! Supports both `/v1/chat/completions` and `/v1/responses` endpoints;
//! the mode and base URL come from typed config, so OpenAI-compatible
//! gateways work with `LLM_OPENAI_BASE_URL`.

use std::time::Duration;

use serde::Serialize;

use super::config::{LlmTimeouts, OpenAiApiMode};
use super::types::LlmError;

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mode: OpenAiApiMode,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        api_key: String,
        mode: OpenAiApiMode,
        base_url: String,
        timeouts: LlmTimeouts,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url, mode })
    }

    /// # Errors
    ///
    /// Returns an error if the request fails, the provider responds with a
    /// non-200 status, or the body cannot be parsed.
    pub async fn complete(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let messages = [
                    CcMessage { role: "system", content: system },
                    CcMessage { role: "user", content: prompt },
                ];
                let body = CcRequest { model, max_tokens, messages: &messages };
                let text = self.send_json("/chat/completions", &body).await?;
                parse_chat_completions_response(&text)
            }
            OpenAiApiMode::Responses => {
                let body = RespRequest { model, max_output_tokens: max_tokens, instructions: system, input: prompt };
                let text = self.send_json("/responses", &body).await?;
                parse_responses_response(&text)
            }
        }
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// CHAT COMPLETIONS — wire types
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct CcResponse {
    choices: Vec<CcChoice>,
}

#[derive(serde::Deserialize)]
struct CcChoice {
    message: CcChoiceMessage,
}

#[derive(serde::Deserialize)]
struct CcChoiceMessage {
    content: Option<String>,
}

fn parse_chat_completions_response(json: &str) -> Result<String, LlmError> {
    let api: CcResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    api.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LlmError::ApiParse("chat completion contained no message content".into()))
}

// =============================================================================
// RESPONSES — wire types
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    instructions: &'a str,
    input: &'a str,
}

#[derive(serde::Deserialize)]
struct RespResponse {
    output: Vec<RespOutputItem>,
}

#[derive(serde::Deserialize)]
struct RespOutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<RespContentItem>,
}

#[derive(serde::Deserialize)]
struct RespContentItem {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

fn parse_responses_response(json: &str) -> Result<String, LlmError> {
    let api: RespResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let parts: Vec<String> = api
        .output
        .into_iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content)
        .filter(|content| content.content_type == "output_text" && !content.text.is_empty())
        .map(|content| content.text)
        .collect();

    if parts.is_empty() {
        return Err(LlmError::ApiParse("response contained no output text".into()));
    }
    Ok(parts.join("\n"))
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
