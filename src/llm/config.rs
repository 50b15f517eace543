//! AI configuration parsed from environment variables.
//!
//! Every AI tunable lives here: provider selection, credentials, model,
//! endpoint mode, the reply token budget, and HTTP timeouts. The API key is
//! read from the selected provider's conventional variable
//! (`ANTHROPIC_API_KEY` or `OPENAI_API_KEY`); an absent key means the relay
//! runs with the responder disabled.

use std::str::FromStr;

use super::types::LlmError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// PROVIDER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Anthropic,
    OpenAi,
}

impl LlmProviderKind {
    /// The conventional environment variable holding this provider's key.
    fn key_var(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5-20250929",
            Self::OpenAi => "gpt-4o",
        }
    }
}

impl FromStr for LlmProviderKind {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, LlmError> {
        match raw.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            other => Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiApiMode {
    ChatCompletions,
    Responses,
}

impl FromStr for OpenAiApiMode {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, LlmError> {
        match raw.to_ascii_lowercase().as_str() {
            "responses" => Ok(Self::Responses),
            "chat_completions" => Ok(Self::ChatCompletions),
            other => Err(LlmError::ConfigParse(format!(
                "unknown LLM_OPENAI_MODE: {other} (expected 'responses' or 'chat_completions')"
            ))),
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub model: String,
    /// Reply token budget for every AI prompt.
    pub max_tokens: u32,
    pub openai_mode: OpenAiApiMode,
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed AI config from environment variables.
    ///
    /// - `LLM_PROVIDER`: `anthropic` (default) or `openai`
    /// - `ANTHROPIC_API_KEY` / `OPENAI_API_KEY`: key for the selected
    ///   provider (required)
    /// - `LLM_MODEL`: provider default when absent
    /// - `AI_MAX_TOKENS`: reply token budget, default 1024
    /// - `LLM_OPENAI_MODE`: `responses` (default) or `chat_completions`
    /// - `LLM_OPENAI_BASE_URL`: default OpenAI API base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS` / `LLM_CONNECT_TIMEOUT_SECS`:
    ///   default 120 / 10
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] when the provider key is absent or a value
    /// cannot be parsed. The responder treats any error as "AI disabled".
    pub fn from_env() -> Result<Self, LlmError> {
        let provider = match env_str("LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => LlmProviderKind::Anthropic,
        };
        let key_var = provider.key_var();
        let api_key = env_str(key_var).ok_or_else(|| LlmError::MissingApiKey { var: key_var.into() })?;

        let model = env_str("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_owned());
        let max_tokens = env_parse("AI_MAX_TOKENS", DEFAULT_MAX_TOKENS);

        let openai_mode = match env_str("LLM_OPENAI_MODE") {
            Some(raw) => raw.parse()?,
            None => OpenAiApiMode::Responses,
        };
        let openai_base_url = env_str("LLM_OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let timeouts = LlmTimeouts {
            request_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { provider, api_key, model, max_tokens, openai_mode, openai_base_url, timeouts })
    }
}

// =============================================================================
// ENV HELPERS
// =============================================================================

/// Read a non-empty environment variable.
fn env_str(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, falling back on absence or a
/// value that does not parse.
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_str(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
