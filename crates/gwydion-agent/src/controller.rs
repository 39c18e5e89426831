//! The ReAct decision loop.
//!
//! One [`ReactController::decide`] call drives a bounded
//! BUILD_PROMPT → AWAIT_RESPONSE → PARSE_AND_ACT cycle against the LLM
//! collaborator. Knowledge queries found in the response are executed
//! against the retrieval engine and folded back into the running observation;
//! the loop ends when a response names a valid environment action (DONE) or
//! the iteration budget runs out (EXHAUSTED, resolved by the deterministic
//! first-action fallback). Every reasoning irregularity along the way —
//! unparsable responses, malformed query calls, hallucinated actions —
//! degrades to a soft observation, so a decision always produces a member of
//! the caller's action list.

use std::sync::Arc;

use tracing::{debug, info, warn};

use gwydion_llm::{CompletionRequest, SharedBackend};
use gwydion_retrieval::RetrievalEngine;
use gwydion_types::Fact;

use crate::classify::{classify, extract_action, extract_query};
use crate::error::{AgentError, Result};
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::types::{ActionKind, ControllerConfig, Decision, DecisionOutcome, ReasoningStep, ReasoningTrace};

/// Drives reasoning for one agent: builds prompts, executes knowledge
/// queries, and validates chosen actions.
pub struct ReactController {
    backend: SharedBackend,
    retrieval: Arc<RetrievalEngine>,
    prompt: PromptBuilder,
    config: ControllerConfig,
}

impl ReactController {
    /// Create a controller with default prompt and configuration.
    pub fn new(backend: SharedBackend, retrieval: Arc<RetrievalEngine>) -> Self {
        Self {
            backend,
            retrieval,
            prompt: PromptBuilder::new(),
            config: ControllerConfig::default(),
        }
    }

    /// Replace the controller configuration.
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.prompt = self
            .prompt
            .clone()
            .with_history_window(config.history_window);
        self.config = config;
        self
    }

    /// Replace the prompt builder.
    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    /// The controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run the full reasoning loop and return a decision.
    ///
    /// Blocks on each LLM round-trip; callers wanting a wall-clock bound
    /// should wrap this future in a cancellable task.
    pub async fn decide(
        &self,
        observation: &str,
        available_actions: &[String],
    ) -> Result<Decision> {
        if available_actions.is_empty() {
            return Err(AgentError::NoAvailableActions);
        }

        let mut trace = ReasoningTrace::new();
        let mut running_observation = observation.to_string();

        info!(
            trace_id = %trace.id,
            actions = available_actions.len(),
            max_iterations = self.config.max_iterations,
            "Decision started"
        );

        for iteration in 0..self.config.max_iterations {
            let prompt = self.prompt.build(
                &running_observation,
                available_actions,
                &trace.steps,
                iteration,
                self.config.max_iterations,
            );
            let request = CompletionRequest::new(prompt)
                .with_max_tokens(self.config.max_tokens)
                .with_temperature(self.config.temperature);

            let response = self.backend.complete(request).await?;
            let steps = parse_response(&response.text);

            // Only the most recent step carries the pending action
            let Some(mut step) = steps.into_iter().next_back() else {
                debug!(iteration, "Response contained no parsable steps");
                running_observation
                    .push_str("\nPrevious response was not in the expected format.");
                continue;
            };
            step.action_kind = classify(&step.action_text, available_actions);

            debug!(
                iteration,
                kind = step.action_kind.as_str(),
                action = %step.action_text,
                "Step classified"
            );

            match step.action_kind {
                ActionKind::QueryKnowledge => {
                    let observation_text = self.run_knowledge_query(&step.action_text);
                    step.observation = observation_text.clone();
                    trace.push(step);
                    running_observation.push_str(&format!("\nKnowledge: {observation_text}"));
                }
                ActionKind::ExecuteAction => {
                    let candidate = extract_action(&step.action_text);
                    if let Some(action) = match_action(&candidate, available_actions) {
                        step.observation = format!("Selected action: {action}");
                        trace.push(step);
                        info!(
                            trace_id = %trace.id,
                            iterations = iteration + 1,
                            action = %action,
                            "Decision complete"
                        );
                        return Ok(Decision {
                            action,
                            outcome: DecisionOutcome::Done,
                            iterations: iteration + 1,
                            trace,
                        });
                    }

                    step.observation = format!("'{candidate}' is not an available action");
                    trace.push(step);
                    running_observation.push_str(&format!("\nPrevious invalid action: {candidate}"));
                }
                ActionKind::Think | ActionKind::Unknown => {
                    let text = step.action_text.clone();
                    step.observation = "No executable action in this step".to_string();
                    trace.push(step);
                    running_observation.push_str(&format!("\nPrevious invalid action: {text}"));
                }
            }
        }

        warn!(
            trace_id = %trace.id,
            "Iteration budget exhausted without a valid action, using fallback"
        );
        Ok(Decision {
            action: available_actions[0].clone(),
            outcome: DecisionOutcome::Exhausted,
            iterations: self.config.max_iterations,
            trace,
        })
    }

    /// Single-shot decision: one keyword retrieval over the observation, one
    /// completion, and an exact-or-fuzzy action match. Falls back to the
    /// first action when the model answers with anything else.
    pub async fn decide_direct(
        &self,
        observation: &str,
        available_actions: &[String],
    ) -> Result<Decision> {
        if available_actions.is_empty() {
            return Err(AgentError::NoAvailableActions);
        }

        let mut trace = ReasoningTrace::new();

        let scored = self
            .retrieval
            .by_keywords(observation, self.config.max_knowledge_results);
        let knowledge = RetrievalEngine::format_results(&scored, false);

        let prompt = self
            .prompt
            .build_direct(observation, available_actions, &knowledge);
        let request = CompletionRequest::new(prompt)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);
        let response = self.backend.complete(request).await?;

        let candidate = response.text.trim().to_string();
        let mut step = ReasoningStep::new(1);
        step.action_kind = ActionKind::ExecuteAction;
        step.action_text = candidate.clone();

        match match_action(&candidate, available_actions) {
            Some(action) => {
                step.observation = format!("Selected action: {action}");
                trace.push(step);
                Ok(Decision {
                    action,
                    outcome: DecisionOutcome::Done,
                    iterations: 1,
                    trace,
                })
            }
            None => {
                warn!(candidate = %candidate, "Direct decision produced no valid action, using fallback");
                step.observation = format!("'{candidate}' is not an available action");
                trace.push(step);
                Ok(Decision {
                    action: available_actions[0].clone(),
                    outcome: DecisionOutcome::Exhausted,
                    iterations: 1,
                    trace,
                })
            }
        }
    }

    /// Execute one `query_kg` call text and render the observation to fold
    /// back into context. Malformed calls yield the literal
    /// "Invalid query format" sentinel rather than an error.
    fn run_knowledge_query(&self, action_text: &str) -> String {
        let Some((kind, query)) = extract_query(action_text) else {
            return "Invalid query format".to_string();
        };

        let facts = self
            .retrieval
            .query(kind, &query, self.config.max_knowledge_results);

        if facts.is_empty() {
            format!("No knowledge found for {kind}: {query}")
        } else {
            format_knowledge(&facts)
        }
    }
}

/// Render retrieved facts as `"[CATEGORY] subject predicate object"`,
/// semicolon-joined.
fn format_knowledge(facts: &[Fact]) -> String {
    facts
        .iter()
        .map(|f| format!("[{}] {} {} {}", f.category, f.subject, f.predicate, f.object))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Match a candidate against the available actions: exact first, then
/// case-insensitive equality, then case-insensitive substring in either
/// direction. Within each tier the first action in the caller's list order
/// wins, so a multi-match is never resolved silently differently between
/// runs.
fn match_action(candidate: &str, available_actions: &[String]) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    if let Some(action) = available_actions.iter().find(|a| *a == candidate) {
        return Some(action.clone());
    }

    let lower = candidate.to_lowercase();
    if let Some(action) = available_actions
        .iter()
        .find(|a| a.to_lowercase() == lower)
    {
        return Some(action.clone());
    }

    if let Some(action) = available_actions.iter().find(|a| {
        let a_lower = a.to_lowercase();
        a_lower.contains(&lower) || lower.contains(&a_lower)
    }) {
        debug!(candidate, action = %action, "Fuzzy-matched action");
        return Some(action.clone());
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
