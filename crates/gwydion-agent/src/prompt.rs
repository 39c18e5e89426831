//! ReAct prompt construction.

use crate::types::ReasoningStep;

/// Builds the prompt sent to the LLM on each loop iteration.
///
/// The prompt carries the format contract (Thought/Action lines), the
/// current observation, the allowed environment actions, how to call
/// `query_kg`, and a short window of recent steps.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    goal: Option<String>,
    include_query_instructions: bool,
    history_window: usize,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            goal: None,
            include_query_instructions: true,
            history_window: 3,
        }
    }

    /// Set a goal line included near the top of every prompt.
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    /// Control whether query_kg call instructions are included.
    pub fn with_query_instructions(mut self, include: bool) -> Self {
        self.include_query_instructions = include;
        self
    }

    /// Number of recent steps echoed back into the prompt.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Render the full reasoning prompt for one iteration.
    pub fn build(
        &self,
        observation: &str,
        available_actions: &[String],
        history: &[ReasoningStep],
        iteration: usize,
        max_iterations: usize,
    ) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.push(
            "You are an intelligent agent using the ReAct (Reasoning and Acting) pattern."
                .to_string(),
        );
        parts.push(String::new());

        if let Some(goal) = &self.goal {
            parts.push(format!("Goal: {goal}"));
            parts.push(String::new());
        }

        parts.push(format!("Current Observation: {observation}"));
        parts.push(String::new());

        if !available_actions.is_empty() {
            parts.push("Available Actions:".to_string());
            for action in available_actions {
                parts.push(format!("- {action}"));
            }
            parts.push(String::new());
        }

        if self.include_query_instructions {
            parts.push(
                "You can also query the knowledge graph using: query_kg('<kind>', '<query>')"
                    .to_string(),
            );
            parts.push("- query_kg('keywords', 'kitchen key') - search by keywords".to_string());
            parts.push(
                "- query_kg('category', 'ACTION:key') - search one category (ACTION/CONDITION/OUTCOME)"
                    .to_string(),
            );
            parts.push("- query_kg('entity', 'chest') - search by entity".to_string());
            parts.push(String::new());
        }

        parts.push("Use this format:".to_string());
        parts.push("Thought: [your reasoning about the current situation]".to_string());
        parts.push("Action: [one available action, or a query_kg() call]".to_string());
        parts.push(String::new());

        if !history.is_empty() {
            parts.push("Previous Steps:".to_string());
            let start = history.len().saturating_sub(self.history_window);
            for step in &history[start..] {
                if !step.thought.is_empty() {
                    parts.push(format!("Thought: {}", step.thought));
                }
                if !step.action_text.is_empty() {
                    parts.push(format!("Action: {}", step.action_text));
                }
                if !step.observation.is_empty() {
                    parts.push(format!("Observation: {}", step.observation));
                }
            }
            parts.push(String::new());
        }

        parts.push(format!("Iteration: {}/{}", iteration + 1, max_iterations));
        parts.push("What should you do next?".to_string());
        parts.push("Thought:".to_string());

        parts.join("\n")
    }

    /// Render the single-shot prompt used by the direct (non-looping)
    /// decision mode: observation, retrieved knowledge, actions, and an
    /// instruction to answer with an action name only.
    pub fn build_direct(
        &self,
        observation: &str,
        available_actions: &[String],
        knowledge: &str,
    ) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.push(
            "You are an intelligent agent. Choose the best action based on the observation and knowledge."
                .to_string(),
        );
        parts.push(String::new());

        if let Some(goal) = &self.goal {
            parts.push(format!("Goal: {goal}"));
            parts.push(String::new());
        }

        parts.push(format!("Current Observation: {observation}"));
        parts.push(String::new());
        parts.push("Relevant Knowledge:".to_string());
        parts.push(knowledge.to_string());
        parts.push(String::new());
        parts.push(format!("Available Actions: {}", available_actions.join(", ")));
        parts.push(String::new());
        parts.push(
            "Choose one action from the available actions. Respond with only the action name."
                .to_string(),
        );

        parts.join("\n")
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
