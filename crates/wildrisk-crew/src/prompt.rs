//! Prompt construction for the advisory backend.
//!
//! Templates are `minijinja` and are embedded in the binary with
//! `include_str!`, so a deployed crew never depends on a templates
//! directory being present at runtime.

use crate::error::CrewError;

const STRATEGIST_SYSTEM: &str = include_str!("../templates/strategist_system.j2");
const STRATEGIST_USER: &str = include_str!("../templates/strategist_user.j2");

/// A fully rendered prompt ready to send to a text backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System instructions establishing the advisor's role.
    pub system: String,
    /// The user message carrying region facts and planned actions.
    pub user: String,
}

/// Context for rendering the strategist narrative prompt.
///
/// Every field is a value the crew already computed deterministically;
/// the advisor only ever narrates, never calculates.
#[derive(Debug, serde::Serialize)]
pub struct StrategistContext {
    /// Display name of the region.
    pub region_name: String,
    /// Overall risk score, 0-100.
    pub overall_score: u32,
    /// Risk band label for the overall score.
    pub risk_category: String,
    /// Exposure sub-score.
    pub exposure: f64,
    /// Historical loss sub-score.
    pub historical_loss: f64,
    /// Vulnerability sub-score.
    pub vulnerability: f64,
    /// Titles of the planned mitigation actions.
    pub action_titles: Vec<String>,
    /// Total estimated cost of the action program in dollars.
    pub total_cost: f64,
}

/// Renders embedded prompt templates.
pub struct PromptEngine {
    env: minijinja::Environment<'static>,
}

impl PromptEngine {
    /// Create an engine with all embedded templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::Template`] if an embedded template fails to
    /// parse, which indicates a packaging defect rather than bad input.
    pub fn new() -> Result<Self, CrewError> {
        let mut env = minijinja::Environment::new();
        env.add_template("strategist_system", STRATEGIST_SYSTEM)
            .map_err(|e| CrewError::Template(e.to_string()))?;
        env.add_template("strategist_user", STRATEGIST_USER)
            .map_err(|e| CrewError::Template(e.to_string()))?;
        Ok(Self { env })
    }

    /// Render the strategist narrative prompt.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::Template`] if rendering fails.
    pub fn render_strategist(&self, context: &StrategistContext) -> Result<RenderedPrompt, CrewError> {
        Ok(RenderedPrompt {
            system: self.render("strategist_system", context)?,
            user: self.render("strategist_user", context)?,
        })
    }

    fn render(&self, name: &str, context: &StrategistContext) -> Result<String, CrewError> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(context))
            .map_err(|e| CrewError::Template(format!("{name}: {e}")))
    }
}
