//! Run-scoped crew state.
//!
//! A [`CrewState`] lives for exactly one crew run. It is created fresh
//! by [`AgentCrew::run`], threaded through the three stage functions,
//! and returned to the caller. Nothing in it survives into the next
//! run; durable results go through the store.
//!
//! [`AgentCrew::run`]: crate::crew::AgentCrew::run

use chrono::Utc;
use wildrisk_types::{AgentMessage, CrewStage, CrewStatus, MitigationStrategy, RegionId, ReportId, RiskScore};

/// The data-quality validator's findings.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAnalysis {
    /// How much of the expected fact surface is present, 0-100.
    pub completeness: f64,
    /// How trustworthy the present facts are, 0-100.
    pub reliability: f64,
    /// Whether both scores met the readiness threshold.
    pub meets_readiness: bool,
    /// One note per missing or weak fact group.
    pub notes: Vec<String>,
}

/// The risk scorer's output, with pointers into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAnalysis {
    /// The score that was persisted.
    pub score: RiskScore,
    /// Id of the report appended to the store.
    pub report_id: ReportId,
}

/// Mutable state shared by the three crew stages for one run.
#[derive(Debug, Clone)]
pub struct CrewState {
    /// The region under analysis.
    pub region_id: RegionId,
    /// The stage currently executing (or last executed).
    pub current_stage: CrewStage,
    /// Stage 1 output.
    pub data_analysis: Option<DataAnalysis>,
    /// Stage 2 output.
    pub risk_analysis: Option<RiskAnalysis>,
    /// Stage 3 output.
    pub mitigation_strategy: Option<MitigationStrategy>,
    /// Structured record of every stage hand-off.
    pub communication_log: Vec<AgentMessage>,
    /// Run lifecycle status.
    pub status: CrewStatus,
}

impl CrewState {
    /// Fresh state for a new run against `region_id`.
    pub const fn new(region_id: RegionId) -> Self {
        Self {
            region_id,
            current_stage: CrewStage::DataQualityValidator,
            data_analysis: None,
            risk_analysis: None,
            mitigation_strategy: None,
            communication_log: Vec::new(),
            status: CrewStatus::Running,
        }
    }

    /// Append a communication-log entry for `stage`.
    ///
    /// `next_agent_id` is derived from the stage ordering, so the log
    /// always chains validator -> scorer -> strategist -> `None`.
    pub fn log_message(
        &mut self,
        stage: CrewStage,
        reasoning: String,
        action: String,
        input: String,
        output: String,
    ) {
        self.communication_log.push(AgentMessage {
            agent_id: stage.agent_id().to_owned(),
            timestamp: Utc::now(),
            reasoning,
            action,
            input,
            output,
            next_agent_id: stage.next().map(|s| s.agent_id().to_owned()),
        });
    }
}
