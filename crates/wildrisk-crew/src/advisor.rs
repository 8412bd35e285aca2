//! Advisory text backend abstraction and implementations.
//!
//! Defines an enum-based dispatch for text backends, avoiding the
//! dyn-compatibility issues with async trait methods. Concrete
//! implementations exist for OpenAI-compatible APIs and the Anthropic
//! Messages API, plus a [`TextAdvisor::Disabled`] variant for offline
//! runs. All backends communicate over HTTP via `reqwest`.
//!
//! The crew never depends on advisor output for numbers. Every call
//! site carries a deterministic fallback, so a failed or disabled
//! advisor only changes the narrative text in a conclusion.

use crate::config::{AdvisorConfig, BackendType};
use crate::error::CrewError;
use crate::prompt::RenderedPrompt;

// ---------------------------------------------------------------------------
// Unified advisor enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// A text backend that can turn a rendered prompt into advisory prose.
///
/// Uses enum dispatch instead of trait objects because async methods
/// are not dyn-compatible in Rust.
pub enum TextAdvisor {
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiAdvisor),
    /// Anthropic Messages API.
    Anthropic(AnthropicAdvisor),
    /// No backend configured. Call sites use their fallback text.
    Disabled,
}

impl TextAdvisor {
    /// Send a prompt and return advisory text, or `None` when the
    /// advisor is disabled or the backend fails.
    ///
    /// Backend failures are logged and absorbed here so a flaky API
    /// never aborts a crew run.
    pub async fn advise(&self, prompt: &RenderedPrompt) -> Option<String> {
        match self.complete(prompt).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(backend = self.name(), error = %err, "advisor call failed, using fallback text");
                None
            }
        }
    }

    /// Send a prompt to the backend and return the raw response text.
    ///
    /// Dispatches to the concrete backend implementation. The disabled
    /// variant returns `Ok(None)` without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::Advisor`] if the HTTP call fails or the
    /// response cannot be extracted.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<Option<String>, CrewError> {
        match self {
            Self::OpenAi(advisor) => advisor.complete(prompt).await.map(Some),
            Self::Anthropic(advisor) => advisor.complete(prompt).await.map(Some),
            Self::Disabled => Ok(None),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
            Self::Disabled => "disabled",
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Advisor backed by an OpenAI-compatible chat completions API.
///
/// Works with `OpenAI`, `DeepSeek`, and Ollama endpoints.
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdvisor {
    /// Create a new `OpenAI`-compatible advisor.
    pub fn new(config: &AdvisorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a prompt and return the response text.
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, CrewError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": 0.3,
            "max_tokens": 600
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CrewError::Advisor(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(CrewError::Advisor(format!(
                "OpenAI returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CrewError::Advisor(format!("OpenAI response parse failed: {e}")))?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, CrewError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            CrewError::Advisor("OpenAI response missing choices[0].message.content".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Advisor backed by the Anthropic Messages API.
///
/// Anthropic uses a different request format from `OpenAI`:
/// - Uses `x-api-key` header instead of `Authorization: Bearer`
/// - Messages array does not include system (system is a top-level field)
/// - Response structure differs: `content[0].text`
pub struct AnthropicAdvisor {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicAdvisor {
    /// Create a new Anthropic Messages API advisor.
    pub fn new(config: &AdvisorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a prompt and return the response text.
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, CrewError> {
        let url = format!("{}/messages", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 600,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CrewError::Advisor(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(CrewError::Advisor(format!(
                "Anthropic returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CrewError::Advisor(format!("Anthropic response parse failed: {e}")))?;

        extract_anthropic_content(&json)
    }
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, CrewError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| CrewError::Advisor("Anthropic response missing content[0].text".to_owned()))
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a text advisor from configuration.
///
/// Dispatches to [`OpenAiAdvisor`] or [`AnthropicAdvisor`] based on the
/// configured [`BackendType`]. A disabled backend or a missing API key
/// yields [`TextAdvisor::Disabled`].
pub fn create_advisor(config: &AdvisorConfig) -> TextAdvisor {
    if config.backend != BackendType::Disabled && config.api_key.is_empty() {
        tracing::warn!("advisor backend configured without an API key, disabling");
        return TextAdvisor::Disabled;
    }
    match config.backend {
        BackendType::OpenAi => TextAdvisor::OpenAi(OpenAiAdvisor::new(config)),
        BackendType::Anthropic => TextAdvisor::Anthropic(AnthropicAdvisor::new(config)),
        BackendType::Disabled => TextAdvisor::Disabled,
    }
}
