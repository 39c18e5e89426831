//! Environment collaborator boundary.
//!
//! The core never talks to a game directly: it hands a chosen action string
//! to an [`Environment`] and receives the next observation, a reward, a done
//! flag, and an opaque info map. Simulator adapters live with the experiment
//! harness; the [`ScriptedEnvironment`] here exists so decision flows can be
//! exercised deterministically in tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One environment transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvStep {
    /// The next observation.
    pub observation: String,
    /// Reward for the action taken.
    pub reward: f64,
    /// True when the episode is over.
    pub done: bool,
    /// Auxiliary data, opaque to the core.
    pub info: HashMap<String, serde_json::Value>,
}

impl EnvStep {
    /// Create a step with no reward and an empty info map.
    pub fn new(observation: impl Into<String>) -> Self {
        Self {
            observation: observation.into(),
            reward: 0.0,
            done: false,
            info: HashMap::new(),
        }
    }

    /// Set the reward.
    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    /// Mark the episode as finished.
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }
}

/// A game or simulator the agent acts in.
pub trait Environment {
    /// Reset to an initial state and return the first observation.
    fn reset(&mut self) -> String;

    /// Execute one action.
    fn step(&mut self, action: &str) -> EnvStep;

    /// Actions currently available to the agent.
    fn available_actions(&self) -> Vec<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Scripted Environment
// ─────────────────────────────────────────────────────────────────────────────

/// An environment that replays a fixed transition script, recording every
/// action it receives. Steps past the end of the script repeat the final
/// entry.
pub struct ScriptedEnvironment {
    initial_observation: String,
    actions: Vec<String>,
    script: Vec<EnvStep>,
    cursor: usize,
    action_log: Vec<String>,
}

impl ScriptedEnvironment {
    /// Create a scripted environment.
    pub fn new(
        initial_observation: impl Into<String>,
        actions: Vec<String>,
        script: Vec<EnvStep>,
    ) -> Self {
        Self {
            initial_observation: initial_observation.into(),
            actions,
            script,
            cursor: 0,
            action_log: Vec::new(),
        }
    }

    /// Actions executed so far, in order.
    pub fn action_log(&self) -> &[String] {
        &self.action_log
    }
}

impl Environment for ScriptedEnvironment {
    fn reset(&mut self) -> String {
        self.cursor = 0;
        self.action_log.clear();
        self.initial_observation.clone()
    }

    fn step(&mut self, action: &str) -> EnvStep {
        self.action_log.push(action.to_string());

        let index = self.cursor.min(self.script.len().saturating_sub(1));
        self.cursor += 1;

        self.script
            .get(index)
            .cloned()
            .unwrap_or_else(|| EnvStep::new("").with_done(true))
    }

    fn available_actions(&self) -> Vec<String> {
        self.actions.clone()
    }
}
