//! Three-stage region analysis crew.
//!
//! A crew run takes one region through a data-quality validator, a
//! risk scorer, and a mitigation strategist. Stages are plain functions
//! over a shared [`CrewState`]; orchestration lives in [`AgentCrew`].
//! Numeric outputs are fully deterministic. An optional [`TextAdvisor`]
//! backend contributes narrative prose, and every advisor call site
//! falls back to deterministic text when the backend is disabled or
//! unreachable.
//!
//! [`CrewState`]: state::CrewState
//! [`AgentCrew`]: crew::AgentCrew
//! [`TextAdvisor`]: advisor::TextAdvisor

pub mod advisor;
pub mod config;
pub mod crew;
pub mod error;
pub mod prompt;
pub mod scorer;
pub mod state;
pub mod strategist;
pub mod validator;

pub use advisor::{TextAdvisor, create_advisor};
pub use config::{AdvisorConfig, BackendType};
pub use crew::{AgentCrew, CrewRun};
pub use error::CrewError;
pub use prompt::{PromptEngine, RenderedPrompt};
pub use state::CrewState;
pub use validator::READINESS_THRESHOLD;
