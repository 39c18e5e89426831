//! Core types for the reasoning controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// ID Types
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a reasoning trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Create a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reasoning Steps
// ─────────────────────────────────────────────────────────────────────────────

/// How a parsed step's action should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A knowledge lookup against the retrieval engine.
    QueryKnowledge,
    /// An action to execute in the environment.
    ExecuteAction,
    /// Pure reasoning, nothing to execute.
    Think,
    /// Unrecognized action text.
    Unknown,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueryKnowledge => "query_knowledge",
            Self::ExecuteAction => "execute_action",
            Self::Think => "think",
            Self::Unknown => "unknown",
        }
    }
}

/// One Thought/Action/Observation unit parsed from an LLM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step_id: u32,
    pub thought: String,
    pub action_kind: ActionKind,
    pub action_text: String,
    pub observation: String,
}

impl ReasoningStep {
    /// Create an empty step with the given id.
    pub fn new(step_id: u32) -> Self {
        Self {
            step_id,
            thought: String::new(),
            action_kind: ActionKind::Unknown,
            action_text: String::new(),
            observation: String::new(),
        }
    }

    /// True when the step carries neither a thought nor an action.
    pub fn is_blank(&self) -> bool {
        self.thought.is_empty() && self.action_text.is_empty()
    }
}

/// The sequence of steps taken during one decision.
///
/// Owned by the controller for the duration of the decision and returned to
/// the caller inside [`Decision`] for logging or inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningTrace {
    pub id: TraceId,
    pub steps: Vec<ReasoningStep>,
    pub started_at: DateTime<Utc>,
}

impl ReasoningTrace {
    /// Start an empty trace.
    pub fn new() -> Self {
        Self {
            id: TraceId::new(),
            steps: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Append a step, renumbering it to its position in the trace.
    pub fn push(&mut self, mut step: ReasoningStep) {
        step.step_id = self.steps.len() as u32 + 1;
        self.steps.push(step);
    }

    /// The most recent step, if any.
    pub fn last(&self) -> Option<&ReasoningStep> {
        self.steps.last()
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when no steps are recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the trace in Thought/Action/Observation form.
    pub fn render(&self, include_observations: bool) -> String {
        if self.steps.is_empty() {
            return "No reasoning steps recorded.".to_string();
        }

        let mut lines = Vec::new();
        for step in &self.steps {
            if !step.thought.is_empty() {
                lines.push(format!("Thought: {}", step.thought));
            }
            if !step.action_text.is_empty() {
                lines.push(format!("Action: {}", step.action_text));
            }
            if include_observations && !step.observation.is_empty() {
                lines.push(format!("Observation: {}", step.observation));
            }
            lines.push(String::new());
        }
        lines.join("\n").trim_end().to_string()
    }
}

impl Default for ReasoningTrace {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller Configuration & Output
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime configuration for the reasoning loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Iteration budget for one decision.
    pub max_iterations: usize,
    /// Knowledge results folded into an observation per query.
    pub max_knowledge_results: usize,
    /// Recent steps echoed back into the prompt.
    pub history_window: usize,
    /// Token budget per completion.
    pub max_tokens: u32,
    /// Sampling temperature per completion.
    pub temperature: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            max_knowledge_results: 3,
            history_window: 3,
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// How a decision concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// A valid environment action was chosen within budget.
    Done,
    /// The budget ran out; the action is the deterministic fallback.
    Exhausted,
}

/// The result of one controller decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// The chosen action — always a member of the caller's action list.
    pub action: String,
    pub outcome: DecisionOutcome,
    /// LLM round-trips spent.
    pub iterations: usize,
    pub trace: ReasoningTrace,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_push_renumbers() {
        let mut trace = ReasoningTrace::new();
        trace.push(ReasoningStep::new(99));
        trace.push(ReasoningStep::new(0));
        assert_eq!(trace.steps[0].step_id, 1);
        assert_eq!(trace.steps[1].step_id, 2);
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn test_trace_render() {
        let mut trace = ReasoningTrace::new();
        let mut step = ReasoningStep::new(1);
        step.thought = "need the key".to_string();
        step.action_text = "take key".to_string();
        step.observation = "picked up the key".to_string();
        trace.push(step);

        let full = trace.render(true);
        assert!(full.contains("Thought: need the key"));
        assert!(full.contains("Action: take key"));
        assert!(full.contains("Observation: picked up the key"));

        let without = trace.render(false);
        assert!(!without.contains("Observation:"));
    }

    #[test]
    fn test_trace_render_empty() {
        let trace = ReasoningTrace::new();
        assert_eq!(trace.render(true), "No reasoning steps recorded.");
    }

    #[test]
    fn test_step_is_blank() {
        let mut step = ReasoningStep::new(1);
        assert!(step.is_blank());
        step.thought = "hm".to_string();
        assert!(!step.is_blank());
    }

    #[test]
    fn test_config_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.max_knowledge_results, 3);
        assert_eq!(config.history_window, 3);
    }
}
