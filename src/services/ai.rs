//! AI responder — chat prompt → single text reply.
//!
//! DESIGN
//! ======
//! Participants invoke the responder with a `/ai ` message prefix. The
//! responder is a capability with two variants: configured (backed by an
//! LLM client) and disabled (no credentials). Both answer every prompt —
//! `respond` never fails. Provider errors are logged and converted to the
//! fixed fallback reply, so the worst user-visible outcome of a broken AI
//! setup is an unhelpful message, never a dropped connection.
//!
//! The model and reply token budget belong to the LLM configuration; this
//! adapter only owns the conversational framing (the system prompt) and the
//! fallback.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::{LlmChat, LlmClient};

/// Reply used for every prompt when the responder is disabled or the
/// provider call fails.
pub const FALLBACK_REPLY: &str = "AI service unavailable";

const SYSTEM_PROMPT: &str = "You are a helpful assistant embedded in a group chat. \
Answer the user's question concisely, in plain text, in at most a few sentences.";

// =============================================================================
// RESPONDER
// =============================================================================

/// AI responder capability. The disabled variant is first-class: the relay
/// runs and tests without any external credentials.
pub enum AiResponder {
    Llm(Arc<dyn LlmChat>),
    Disabled,
}

impl AiResponder {
    /// Build the responder from environment variables. Any configuration
    /// error downgrades to [`AiResponder::Disabled`] with a warning —
    /// missing credentials are an expected deployment, not a fault.
    #[must_use]
    pub fn from_env() -> Self {
        match LlmClient::from_env() {
            Ok(client) => {
                info!(model = client.model(), "LLM client initialized");
                Self::Llm(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "LLM client not configured — AI replies will use the fallback message");
                Self::Disabled
            }
        }
    }

    /// Answer a prompt. Never fails: the disabled branch and any provider
    /// error both yield [`FALLBACK_REPLY`].
    pub async fn respond(&self, prompt: &str) -> String {
        match self {
            Self::Disabled => FALLBACK_REPLY.to_owned(),
            Self::Llm(client) => {
                info!(prompt_len = prompt.len(), "ai: prompt received");
                match client.complete(SYSTEM_PROMPT, prompt).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "ai: provider call failed, sending fallback");
                        FALLBACK_REPLY.to_owned()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "ai_test.rs"]
mod tests;
