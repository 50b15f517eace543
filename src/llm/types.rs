//! LLM types — provider-neutral trait and errors.
//!
//! The relay only ever needs one-shot text completion: a system prompt, a
//! user prompt, a token budget, and a plain-text reply. Provider clients
//! implement [`LlmChat`]; tests substitute mocks.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations. None of these escape the AI
/// responder adapter — they are logged and converted to the fallback reply.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for one-shot completion. Enables mocking in
/// tests. The model and reply token budget come from the implementation's
/// configuration, not the call site.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a single-turn completion request and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the response is
    /// malformed.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}
