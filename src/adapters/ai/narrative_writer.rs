//! Narrative Writer - fallback-first LLM rewriting of deterministic texts.
//!
//! Every audit message is computed deterministically first; the LLM call is
//! a cosmetic rewrite on top. If the provider fails in any way, or returns
//! something that violates the expected shape, the deterministic fallback is
//! returned unchanged. The caller never sees an error from this layer.

use std::sync::Arc;

use crate::ports::{AIProvider, CompletionRequest, Message};

/// Maximum non-empty lines allowed in a digest rewrite.
const MAX_DIGEST_LINES: usize = 9;
/// Maximum characters allowed in a paragraph rewrite.
const MAX_PARAGRAPH_CHARS: usize = 900;

/// Markers of the long report format that digests must never take.
const REPORT_MARKERS: [&str; 4] = [
    "**Hallazgos",
    "**Por qué",
    "Cómo corregir",
    "Reporte de Auditoría",
];

/// Rewrites deterministic texts through an [`AIProvider`], guarding the
/// output shape and falling back silently.
pub struct NarrativeWriter {
    provider: Arc<dyn AIProvider>,
}

impl NarrativeWriter {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Rewrites a short digest. The result keeps the digest shape: at most
    /// 9 non-empty lines and none of the long-report markers.
    pub async fn digest(&self, system_prompt: &str, user_prompt: &str, fallback: &str) -> String {
        let content = match self.complete(system_prompt, user_prompt).await {
            Some(content) => content,
            None => return fallback.to_string(),
        };

        let non_empty_lines = content.lines().filter(|l| !l.trim().is_empty()).count();
        let looks_like_report = REPORT_MARKERS.iter().any(|m| content.contains(m));
        if looks_like_report || non_empty_lines > MAX_DIGEST_LINES {
            return fallback.to_string();
        }
        content
    }

    /// Rewrites a one-paragraph summary. Overlong or list-shaped output
    /// falls back.
    pub async fn paragraph(&self, system_prompt: &str, user_prompt: &str, fallback: &str) -> String {
        let content = match self.complete(system_prompt, user_prompt).await {
            Some(content) => content,
            None => return fallback.to_string(),
        };

        let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() > MAX_PARAGRAPH_CHARS || collapsed.contains("- ") {
            return fallback.to_string();
        }
        collapsed
    }

    /// Rewrites a long multi-section report. No shape guardrail; only
    /// provider failures fall back.
    pub async fn report(&self, system_prompt: &str, user_prompt: &str, fallback: &str) -> String {
        match self.complete(system_prompt, user_prompt).await {
            Some(content) => content,
            None => fallback.to_string(),
        }
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Option<String> {
        let request = CompletionRequest {
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            max_tokens: None,
            temperature: None,
        };

        match self.provider.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => Some(response.content),
            Ok(_) => {
                tracing::warn!("provider returned empty content, using fallback");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "provider call failed, using fallback");
                None
            }
        }
    }
}
