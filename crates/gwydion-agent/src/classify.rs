//! Action classification and call-grammar extraction.
//!
//! Classification decides how a parsed step's action text should be handled;
//! extraction pulls the arguments out of `query_kg(...)` and
//! `execute_action(...)` call shapes. Extraction is deliberately strict about
//! the two-argument `query_kg` grammar — anything else is reported as `None`
//! so the controller can feed back a soft "Invalid query format" observation
//! instead of failing the loop.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use gwydion_types::QueryKind;

use crate::types::{ActionKind, ReasoningStep};

/// The `query_kg('<kind>', '<query>')` call grammar. Both arguments must be
/// quoted (single or double).
static QUERY_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)query_kg\s*\(\s*['"]([^'"]+)['"]\s*,\s*['"]([^'"]+)['"]\s*\)"#).unwrap()
});

/// The `execute_action('<action>')` call grammar; the quotes are optional.
static EXECUTE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)execute_action\s*\(\s*['"]?(.*?)['"]?\s*\)"#).unwrap()
});

/// Lower-case leading verbs of the caller's available actions.
fn action_verbs(available_actions: &[String]) -> Vec<String> {
    available_actions
        .iter()
        .filter_map(|a| a.split_whitespace().next())
        .map(|v| v.to_lowercase())
        .collect()
}

/// Classify a step's action text.
///
/// Knowledge queries are recognized by their call shape or by explicit
/// knowledge-search phrasing; environment actions by the `execute_action`
/// call shape or by a verb drawn from the caller-supplied action vocabulary;
/// pure reasoning by thinking phrases. Everything else is unknown.
pub fn classify(action_text: &str, available_actions: &[String]) -> ActionKind {
    let lower = action_text.trim().to_lowercase();
    if lower.is_empty() {
        return ActionKind::Unknown;
    }

    if lower.contains("query_kg")
        || lower.starts_with("search_kg(")
        || lower.contains("search knowledge")
    {
        return ActionKind::QueryKnowledge;
    }

    let verbs = action_verbs(available_actions);
    if lower.contains("execute_action")
        || lower
            .split_whitespace()
            .any(|word| verbs.iter().any(|v| v == word))
    {
        return ActionKind::ExecuteAction;
    }

    if lower.contains("think") || lower.contains("reasoning") {
        return ActionKind::Think;
    }

    ActionKind::Unknown
}

/// Extract the `(kind, query)` pair from a `query_kg` call.
///
/// An unrecognized kind name degrades to keyword search; a call that does
/// not match the two-argument grammar at all yields `None`.
pub fn extract_query(action_text: &str) -> Option<(QueryKind, String)> {
    let caps = QUERY_CALL.captures(action_text)?;
    let kind = QueryKind::from_str(&caps[1]).unwrap_or(QueryKind::Keywords);
    Some((kind, caps[2].trim().to_string()))
}

/// Extract the environment action from action text: the `execute_action`
/// argument when that shape is present, the bare text otherwise.
pub fn extract_action(action_text: &str) -> String {
    if let Some(caps) = EXECUTE_CALL.captures(action_text) {
        return caps[1].trim().to_string();
    }
    action_text.trim().to_string()
}

/// Validate a parsed step: it must carry a thought or an action, and call
/// shapes must extract cleanly.
pub fn validate_step(step: &ReasoningStep) -> Result<(), String> {
    if step.is_blank() {
        return Err("step must contain either a thought or an action".to_string());
    }

    match step.action_kind {
        ActionKind::QueryKnowledge => {
            if extract_query(&step.action_text).is_none() {
                return Err("query action must contain a valid query_kg call".to_string());
            }
        }
        ActionKind::ExecuteAction => {
            if extract_action(&step.action_text).is_empty() {
                return Err("execute action must contain a valid action".to_string());
            }
        }
        ActionKind::Think | ActionKind::Unknown => {}
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
