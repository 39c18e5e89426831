//! ReAct reasoning controller for Gwydion.
//!
//! This crate drives the bounded reasoning loop that lets a text-game agent
//! consult the knowledge core mid-decision:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ReactController                                            │
//! │  BUILD_PROMPT ──▶ AWAIT_RESPONSE ──▶ PARSE_AND_ACT          │
//! │       ▲                                   │                 │
//! │       └────────── knowledge query ────────┤                 │
//! │                                           ▼                 │
//! │                            DONE (action) / EXHAUSTED        │
//! └─────────────────────────────────────────────────────────────┘
//!              │                       │
//!              ▼                       ▼
//!       ┌────────────┐         ┌──────────────┐
//!       │ LlmBackend │         │ Retrieval    │
//!       │ (gwydion-  │         │ Engine       │
//!       │  llm)      │         │              │
//!       └────────────┘         └──────────────┘
//! ```
//!
//! # Core Components
//!
//! - [`ReactController`]: the decision loop
//! - [`parse_response`]: line-scanner from free text to [`ReasoningStep`]s
//! - [`classify()`]: step-action classification against the caller's vocabulary
//! - [`PromptBuilder`]: prompt assembly with query_kg call instructions
//! - [`Environment`]: the game/simulator boundary

pub mod classify;
pub mod controller;
pub mod env;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod types;

// Re-export core types
pub use error::{AgentError, Result};
pub use types::{
    ActionKind, ControllerConfig, Decision, DecisionOutcome, ReasoningStep, ReasoningTrace,
    TraceId,
};

// Re-export the controller
pub use controller::ReactController;

// Re-export parsing and classification
pub use classify::{classify, extract_action, extract_query, validate_step};
pub use parser::parse_response;

// Re-export prompt builder
pub use prompt::PromptBuilder;

// Re-export environment boundary
pub use env::{EnvStep, Environment, ScriptedEnvironment};
