//! Advisory backend configuration.

/// Which text backend the crew's advisor talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// Any OpenAI-compatible chat completions API.
    OpenAi,
    /// The Anthropic messages API.
    Anthropic,
    /// No backend; every call site falls back to deterministic text.
    Disabled,
}

/// Configuration for the advisory text backend.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Backend selector.
    pub backend: BackendType,
    /// Base URL of the backend API.
    pub api_url: String,
    /// API key. Overridable via `WILDRISK_ADVISOR_API_KEY`.
    pub api_key: String,
    /// Model identifier to request.
    pub model: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Disabled,
            api_url: String::new(),
            api_key: String::new(),
            model: String::new(),
        }
    }
}

impl AdvisorConfig {
    /// Applies environment overrides. The key never belongs in a config
    /// file checked into version control.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("WILDRISK_ADVISOR_API_KEY") {
            self.api_key = key;
        }
    }
}
